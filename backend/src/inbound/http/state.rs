//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DeckCommand, DeckQuery, FlashcardBulkCommand, FlashcardCommand, FlashcardQuery, LoginService,
    SignupService,
};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub decks: Arc<dyn DeckCommand>,
    pub decks_query: Arc<dyn DeckQuery>,
    pub flashcards: Arc<dyn FlashcardCommand>,
    pub flashcards_query: Arc<dyn FlashcardQuery>,
    pub bulk: Arc<dyn FlashcardBulkCommand>,
}

/// Account ports, grouped so callers wire them from one service.
#[derive(Clone)]
pub struct AccountPorts {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
}

/// Deck and flashcard ports.
#[derive(Clone)]
pub struct ContentPorts {
    pub decks: Arc<dyn DeckCommand>,
    pub decks_query: Arc<dyn DeckQuery>,
    pub flashcards: Arc<dyn FlashcardCommand>,
    pub flashcards_query: Arc<dyn FlashcardQuery>,
    pub bulk: Arc<dyn FlashcardBulkCommand>,
}

impl HttpState {
    /// Assemble state from account and content ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use flashcards::domain::{AccountService, DeckService, FlashcardService};
    /// use flashcards::inbound::http::state::{AccountPorts, ContentPorts, HttpState};
    /// use flashcards::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let accounts = Arc::new(AccountService::new(store.clone(), clock.clone()));
    /// let decks = Arc::new(DeckService::new(store.clone(), clock.clone()));
    /// let cards = Arc::new(FlashcardService::new(store.clone(), store.clone(), clock));
    ///
    /// let state = HttpState::new(
    ///     AccountPorts {
    ///         login: accounts.clone(),
    ///         signup: accounts,
    ///     },
    ///     ContentPorts {
    ///         decks: decks.clone(),
    ///         decks_query: decks,
    ///         flashcards: cards.clone(),
    ///         flashcards_query: cards.clone(),
    ///         bulk: cards,
    ///     },
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(accounts: AccountPorts, content: ContentPorts) -> Self {
        let AccountPorts { login, signup } = accounts;
        let ContentPorts {
            decks,
            decks_query,
            flashcards,
            flashcards_query,
            bulk,
        } = content;
        Self {
            login,
            signup,
            decks,
            decks_query,
            flashcards,
            flashcards_query,
            bulk,
        }
    }
}
