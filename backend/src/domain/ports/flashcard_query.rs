//! Driving port for flashcard reads.

use async_trait::async_trait;

use crate::domain::{DeckId, Error, Flashcard, FlashcardId, UserId};

/// Flashcard read use-cases, scoped to the requesting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlashcardQuery: Send + Sync {
    /// The requester's cards, restricted to `deck` when given.
    async fn list_flashcards(
        &self,
        owner: &UserId,
        deck: Option<DeckId>,
    ) -> Result<Vec<Flashcard>, Error>;

    /// One card the requester owns, or `not_found`.
    async fn get_flashcard(
        &self,
        owner: &UserId,
        flashcard_id: FlashcardId,
    ) -> Result<Flashcard, Error>;
}
