//! Port for flashcard persistence.
//!
//! Like decks, every read and write is filtered by owner inside the query.

use async_trait::async_trait;

use crate::domain::{DeckId, Flashcard, FlashcardChanges, FlashcardId, NewFlashcard, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by flashcard repository adapters.
    pub enum FlashcardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "flashcard repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "flashcard repository query failed: {message}",
    }
}

/// Owner-scoped flashcard storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlashcardRepository: Send + Sync {
    /// Cards owned by `owner`, optionally restricted to one deck, in id order.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        deck: Option<DeckId>,
    ) -> Result<Vec<Flashcard>, FlashcardRepositoryError>;

    /// The card with `id` if `owner` owns it.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
    ) -> Result<Option<Flashcard>, FlashcardRepositoryError>;

    /// Insert one card and return it with its assigned id.
    async fn insert(&self, card: &NewFlashcard) -> Result<Flashcard, FlashcardRepositoryError>;

    /// Insert all cards in a single atomic statement, returning ids in input order.
    async fn insert_batch(
        &self,
        cards: &[NewFlashcard],
    ) -> Result<Vec<FlashcardId>, FlashcardRepositoryError>;

    /// Apply `changes` to the card if `owner` owns it.
    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
        changes: &FlashcardChanges,
    ) -> Result<Option<Flashcard>, FlashcardRepositoryError>;

    /// Delete the card; `false` when nothing matched.
    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
    ) -> Result<bool, FlashcardRepositoryError>;

    /// Delete every card in `deck` that `owner` owns, returning the count.
    async fn delete_in_deck_for_owner(
        &self,
        owner: &UserId,
        deck: DeckId,
    ) -> Result<u64, FlashcardRepositoryError>;
}
