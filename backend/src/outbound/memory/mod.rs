//! Process-local store implementing every repository port.
//!
//! Used when no database is configured and as the backing store for HTTP
//! integration tests. Data lives in one mutex-guarded state so deletes can
//! cascade the same way the PostgreSQL foreign keys do.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, DeckRepository, DeckRepositoryError,
    FlashcardRepository, FlashcardRepositoryError, NewAccount, StoredCredentials, WipeSummary,
};
use crate::domain::{
    Deck, DeckChanges, DeckDraft, DeckId, Flashcard, FlashcardChanges, FlashcardDraft,
    FlashcardId, NewDeck, NewFlashcard, User, UserId,
};

#[derive(Debug, Clone)]
struct AccountRecord {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Uuid, AccountRecord>,
    decks: BTreeMap<i64, Deck>,
    cards: BTreeMap<i64, Flashcard>,
    next_deck_id: i64,
    next_card_id: i64,
}

impl State {
    fn allocate_deck_id(&mut self) -> i64 {
        self.next_deck_id += 1;
        self.next_deck_id
    }

    fn allocate_card_id(&mut self) -> i64 {
        self.next_card_id += 1;
        self.next_card_id
    }

    fn has_account(&self, owner: &UserId) -> bool {
        self.accounts.contains_key(owner.as_uuid())
    }

    fn owned_deck(&self, owner: &UserId, id: DeckId) -> Option<&Deck> {
        self.decks
            .get(&id.get())
            .filter(|deck| deck.owner() == owner)
    }

    fn owned_card(&self, owner: &UserId, id: FlashcardId) -> Option<&Flashcard> {
        self.cards
            .get(&id.get())
            .filter(|card| card.owner() == owner)
    }

    fn card_from(&mut self, card: &NewFlashcard) -> Flashcard {
        Flashcard::new(FlashcardDraft {
            id: FlashcardId::new(self.allocate_card_id()),
            question: card.question.clone(),
            answer: card.answer.clone(),
            deck: card.deck,
            owner: card.owner.clone(),
            created_at: card.created_at,
        })
    }
}

/// In-memory implementation of the account, deck and flashcard ports.
///
/// # Examples
/// ```
/// use flashcards::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// assert_eq!(store.deck_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of decks across all owners.
    pub fn deck_count(&self) -> usize {
        self.state().decks.len()
    }

    /// Number of flashcards across all owners.
    pub fn flashcard_count(&self) -> usize {
        self.state().cards.len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create(&self, account: &NewAccount) -> Result<User, AccountRepositoryError> {
        let mut state = self.state();
        let taken = state
            .accounts
            .values()
            .any(|record| record.user.username() == &account.username);
        if taken {
            return Err(AccountRepositoryError::duplicate_username(
                account.username.as_ref(),
            ));
        }
        let user = User::new(
            account.id.clone(),
            account.username.clone(),
            account.is_privileged,
        );
        state.accounts.insert(
            *account.id.as_uuid(),
            AccountRecord {
                user: user.clone(),
                password_hash: account.password_hash.clone(),
            },
        );
        Ok(user)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        Ok(self
            .state()
            .accounts
            .values()
            .find(|record| record.user.username().as_ref() == username)
            .map(|record| StoredCredentials {
                user: record.user.clone(),
                password_hash: record.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountRepositoryError> {
        Ok(self
            .state()
            .accounts
            .get(id.as_uuid())
            .map(|record| record.user.clone()))
    }

    async fn delete_non_privileged(&self) -> Result<WipeSummary, AccountRepositoryError> {
        let mut state = self.state();
        let before = (state.accounts.len(), state.decks.len(), state.cards.len());

        state.accounts.retain(|_, record| record.user.is_privileged());
        let State {
            accounts,
            decks,
            cards,
            ..
        } = &mut *state;
        decks.retain(|_, deck| accounts.contains_key(deck.owner().as_uuid()));
        cards.retain(|_, card| accounts.contains_key(card.owner().as_uuid()));

        let removed = |was: usize, now: usize| (was - now) as u64;
        Ok(WipeSummary {
            users: removed(before.0, state.accounts.len()),
            decks: removed(before.1, state.decks.len()),
            flashcards: removed(before.2, state.cards.len()),
        })
    }
}

#[async_trait]
impl DeckRepository for InMemoryStore {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Deck>, DeckRepositoryError> {
        Ok(self
            .state()
            .decks
            .values()
            .filter(|deck| deck.owner() == owner)
            .cloned()
            .collect())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        Ok(self.state().owned_deck(owner, id).cloned())
    }

    async fn insert(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError> {
        let mut state = self.state();
        if !state.has_account(&deck.owner) {
            return Err(DeckRepositoryError::query("owner does not exist"));
        }
        let id = state.allocate_deck_id();
        let stored = Deck::new(DeckDraft {
            id: DeckId::new(id),
            name: deck.name.clone(),
            description: deck.description.clone(),
            owner: deck.owner.clone(),
            created_at: deck.created_at,
            updated_at: deck.created_at,
        });
        state.decks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
        changes: &DeckChanges,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        let mut state = self.state();
        let Some(current) = state.owned_deck(owner, id) else {
            return Ok(None);
        };
        let updated = Deck::new(DeckDraft {
            id,
            name: changes
                .name
                .clone()
                .unwrap_or_else(|| current.name().clone()),
            description: match &changes.description {
                Some(description) => description.clone(),
                None => current.description().map(str::to_owned),
            },
            owner: owner.clone(),
            created_at: current.created_at(),
            updated_at: changes.updated_at,
        });
        state.decks.insert(id.get(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
    ) -> Result<bool, DeckRepositoryError> {
        let mut state = self.state();
        if state.owned_deck(owner, id).is_none() {
            return Ok(false);
        }
        state.decks.remove(&id.get());
        state.cards.retain(|_, card| card.deck() != id);
        Ok(true)
    }
}

#[async_trait]
impl FlashcardRepository for InMemoryStore {
    async fn list_for_owner(
        &self,
        owner: &UserId,
        deck: Option<DeckId>,
    ) -> Result<Vec<Flashcard>, FlashcardRepositoryError> {
        Ok(self
            .state()
            .cards
            .values()
            .filter(|card| card.owner() == owner)
            .filter(|card| deck.is_none_or(|deck| card.deck() == deck))
            .cloned()
            .collect())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
    ) -> Result<Option<Flashcard>, FlashcardRepositoryError> {
        Ok(self.state().owned_card(owner, id).cloned())
    }

    async fn insert(&self, card: &NewFlashcard) -> Result<Flashcard, FlashcardRepositoryError> {
        let mut state = self.state();
        if !state.has_account(&card.owner) {
            return Err(FlashcardRepositoryError::query("owner does not exist"));
        }
        if !state.decks.contains_key(&card.deck.get()) {
            return Err(FlashcardRepositoryError::query("deck does not exist"));
        }
        let stored = state.card_from(card);
        state.cards.insert(stored.id().get(), stored.clone());
        Ok(stored)
    }

    async fn insert_batch(
        &self,
        cards: &[NewFlashcard],
    ) -> Result<Vec<FlashcardId>, FlashcardRepositoryError> {
        let mut state = self.state();
        if cards.iter().any(|card| !state.has_account(&card.owner)) {
            return Err(FlashcardRepositoryError::query("owner does not exist"));
        }
        if cards
            .iter()
            .any(|card| !state.decks.contains_key(&card.deck.get()))
        {
            return Err(FlashcardRepositoryError::query("deck does not exist"));
        }
        let mut ids = Vec::with_capacity(cards.len());
        for card in cards {
            let stored = state.card_from(card);
            ids.push(stored.id());
            state.cards.insert(stored.id().get(), stored);
        }
        Ok(ids)
    }

    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
        changes: &FlashcardChanges,
    ) -> Result<Option<Flashcard>, FlashcardRepositoryError> {
        let mut state = self.state();
        let Some(current) = state.owned_card(owner, id) else {
            return Ok(None);
        };
        let updated = Flashcard::new(FlashcardDraft {
            id,
            question: changes
                .question
                .clone()
                .unwrap_or_else(|| current.question().clone()),
            answer: changes
                .answer
                .clone()
                .unwrap_or_else(|| current.answer().clone()),
            deck: changes.deck.unwrap_or_else(|| current.deck()),
            owner: owner.clone(),
            created_at: current.created_at(),
        });
        state.cards.insert(id.get(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
    ) -> Result<bool, FlashcardRepositoryError> {
        let mut state = self.state();
        if state.owned_card(owner, id).is_none() {
            return Ok(false);
        }
        state.cards.remove(&id.get());
        Ok(true)
    }

    async fn delete_in_deck_for_owner(
        &self,
        owner: &UserId,
        deck: DeckId,
    ) -> Result<u64, FlashcardRepositoryError> {
        let mut state = self.state();
        let before = state.cards.len();
        state
            .cards
            .retain(|_, card| !(card.owner() == owner && card.deck() == deck));
        Ok((before - state.cards.len()) as u64)
    }
}
