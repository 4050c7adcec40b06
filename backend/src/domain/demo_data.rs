//! Demo data reset.
//!
//! Public demo deployments are periodically wiped back to their privileged
//! accounts. Decks and flashcards go with their owners.

use std::sync::Arc;

use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{AccountRepository, AccountRepositoryError, WipeSummary};

/// Service that removes every non-privileged account and its content.
pub struct DemoDataWipeService<A> {
    accounts: Arc<A>,
}

impl<A> DemoDataWipeService<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    /// Delete all demo content, returning what was removed.
    pub async fn wipe(&self) -> Result<WipeSummary, Error> {
        let summary = self
            .accounts
            .delete_non_privileged()
            .await
            .map_err(|err| match err {
                AccountRepositoryError::Connection { message } => Error::service_unavailable(
                    format!("account repository unavailable: {message}"),
                ),
                other => Error::internal(other.to_string()),
            })?;
        info!(
            users = summary.users,
            decks = summary.decks,
            flashcards = summary.flashcards,
            "demo data wiped"
        );
        Ok(summary)
    }
}
