//! Driving port for single-flashcard mutations.

use async_trait::async_trait;

use crate::domain::{DeckId, Error, Flashcard, FlashcardId, UserId};

use super::UpdateMode;

/// Unvalidated flashcard fields as supplied by a client.
///
/// Missing fields stay `None` so validation can report every problem at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashcardInput {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub deck: Option<DeckId>,
}

/// Request to create a flashcard owned by `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFlashcardRequest {
    pub owner: UserId,
    pub input: FlashcardInput,
}

/// Request to update one of `owner`'s flashcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFlashcardRequest {
    pub owner: UserId,
    pub flashcard_id: FlashcardId,
    pub mode: UpdateMode,
    pub input: FlashcardInput,
}

/// Flashcard write use-cases, scoped to the requesting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlashcardCommand: Send + Sync {
    /// Create a card in one of the requester's decks.
    async fn create_flashcard(&self, request: CreateFlashcardRequest) -> Result<Flashcard, Error>;

    /// Update a card the requester owns, or fail with `not_found`.
    async fn update_flashcard(&self, request: UpdateFlashcardRequest) -> Result<Flashcard, Error>;

    /// Delete a card the requester owns, or fail with `not_found`.
    async fn delete_flashcard(&self, owner: &UserId, flashcard_id: FlashcardId)
    -> Result<(), Error>;
}
