//! Driving port for batch flashcard operations.
//!
//! Bulk create is all-or-nothing: one invalid record rejects the batch and
//! nothing is written. Bulk delete is idempotent and never reports
//! `not_found`; a foreign or unknown deck simply deletes zero cards.

use async_trait::async_trait;

use crate::domain::{DeckId, Error, FlashcardId, UserId};

use super::FlashcardInput;

/// Result of a successful bulk create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCreateOutcome {
    /// Ids of the created cards, in input order.
    pub ids: Vec<FlashcardId>,
}

impl BulkCreateOutcome {
    /// Number of cards created.
    pub fn created(&self) -> usize {
        self.ids.len()
    }
}

/// Batch flashcard use-cases, scoped to the requesting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlashcardBulkCommand: Send + Sync {
    /// Validate every record, then insert them all in one statement.
    async fn bulk_create(
        &self,
        owner: &UserId,
        records: Vec<FlashcardInput>,
    ) -> Result<BulkCreateOutcome, Error>;

    /// Delete the requester's cards in `deck`, returning how many went.
    async fn bulk_delete(&self, owner: &UserId, deck: DeckId) -> Result<u64, Error>;
}
