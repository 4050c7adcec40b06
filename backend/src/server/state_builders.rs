//! Builders wiring repositories into the domain services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use flashcards::domain::ports::{AccountRepository, DeckRepository, FlashcardRepository};
use flashcards::domain::{AccountService, DeckService, FlashcardService};
use flashcards::inbound::http::state::{AccountPorts, ContentPorts, HttpState};
use flashcards::outbound::persistence::{
    DieselAccountRepository, DieselDeckRepository, DieselFlashcardRepository,
};

use super::config::StoreBackend;

/// Wrap each service once and hand out its driving ports.
fn state_from_repositories<A, D, F>(
    accounts: Arc<A>,
    decks: Arc<D>,
    cards: Arc<F>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    A: AccountRepository + 'static,
    D: DeckRepository + 'static,
    F: FlashcardRepository + 'static,
{
    let account_service = Arc::new(AccountService::new(accounts, clock.clone()));
    let deck_service = Arc::new(DeckService::new(decks.clone(), clock.clone()));
    let card_service = Arc::new(FlashcardService::new(cards, decks, clock));

    HttpState::new(
        AccountPorts {
            login: account_service.clone(),
            signup: account_service,
        },
        ContentPorts {
            decks: deck_service.clone(),
            decks_query: deck_service,
            flashcards: card_service.clone(),
            flashcards_query: card_service.clone(),
            bulk: card_service,
        },
    )
}

/// Build the HTTP state for the configured store.
pub(super) fn build_http_state(store: &StoreBackend) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match store {
        StoreBackend::Postgres(pool) => state_from_repositories(
            Arc::new(DieselAccountRepository::new(pool.clone())),
            Arc::new(DieselDeckRepository::new(pool.clone())),
            Arc::new(DieselFlashcardRepository::new(pool.clone())),
            clock,
        ),
        StoreBackend::Memory(store) => {
            state_from_repositories(store.clone(), store.clone(), store.clone(), clock)
        }
    };
    web::Data::new(state)
}
