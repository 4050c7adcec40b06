//! Driving port for deck reads.

use async_trait::async_trait;

use crate::domain::{Deck, DeckId, Error, UserId};

/// Deck read use-cases, scoped to the requesting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeckQuery: Send + Sync {
    /// Every deck the requester owns.
    async fn list_decks(&self, owner: &UserId) -> Result<Vec<Deck>, Error>;

    /// One deck the requester owns, or `not_found`.
    async fn get_deck(&self, owner: &UserId, deck_id: DeckId) -> Result<Deck, Error>;
}
