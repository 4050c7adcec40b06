//! Port for deck persistence.
//!
//! Every operation takes the caller's [`UserId`] and filters by it in the
//! query itself; a deck owned by someone else behaves exactly like a deck
//! that does not exist.

use async_trait::async_trait;

use crate::domain::{Deck, DeckChanges, DeckId, NewDeck, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by deck repository adapters.
    pub enum DeckRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "deck repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "deck repository query failed: {message}",
    }
}

/// Owner-scoped deck storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// All decks owned by `owner`, in id order.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Deck>, DeckRepositoryError>;

    /// The deck with `id` if `owner` owns it.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
    ) -> Result<Option<Deck>, DeckRepositoryError>;

    /// Insert a deck and return it with its assigned id.
    async fn insert(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError>;

    /// Apply `changes` to the deck if `owner` owns it.
    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
        changes: &DeckChanges,
    ) -> Result<Option<Deck>, DeckRepositoryError>;

    /// Delete the deck and its flashcards; `false` when nothing matched.
    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
    ) -> Result<bool, DeckRepositoryError>;
}
