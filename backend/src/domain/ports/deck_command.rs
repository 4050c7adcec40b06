//! Driving port for deck mutations.

use async_trait::async_trait;

use crate::domain::{Deck, DeckId, Error, UserId};

/// Whether an update replaces the resource or patches a subset of fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Every required field must be supplied.
    Replace,
    /// Only supplied fields change.
    Partial,
}

/// Request to create a deck owned by `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDeckRequest {
    pub owner: UserId,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request to update one of `owner`'s decks.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDeckRequest {
    pub owner: UserId,
    pub deck_id: DeckId,
    pub mode: UpdateMode,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Deck write use-cases, scoped to the requesting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckCommand: Send + Sync {
    /// Create a deck; the owner is always the requester.
    async fn create_deck(&self, request: CreateDeckRequest) -> Result<Deck, Error>;

    /// Update a deck the requester owns, or fail with `not_found`.
    async fn update_deck(&self, request: UpdateDeckRequest) -> Result<Deck, Error>;

    /// Delete a deck the requester owns, cascading to its flashcards.
    async fn delete_deck(&self, owner: &UserId, deck_id: DeckId) -> Result<(), Error>;
}
