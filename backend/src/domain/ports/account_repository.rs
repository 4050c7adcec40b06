//! Port for user account persistence.
//!
//! Accounts are the only place password digests live. Deleting an account
//! removes the user's decks and flashcards with it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } =>
            "username {username} is already taken",
    }
}

/// Account insert request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub is_privileged: bool,
    pub created_at: DateTime<Utc>,
}

/// Account row as needed for authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Rows removed by [`AccountRepository::delete_non_privileged`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WipeSummary {
    pub users: u64,
    pub decks: u64,
    pub flashcards: u64,
}

impl WipeSummary {
    /// Total number of rows removed, cascades included.
    pub fn total(&self) -> u64 {
        self.users + self.decks + self.flashcards
    }
}

/// Port for creating, looking up and purging accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account, failing with `DuplicateUsername` on conflicts.
    async fn create(&self, account: &NewAccount) -> Result<User, AccountRepositoryError>;

    /// Load the user and digest for `username`, if such an account exists.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Load the user with `id`, if the account still exists.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountRepositoryError>;

    /// Delete every non-privileged account together with its decks and cards.
    async fn delete_non_privileged(&self) -> Result<WipeSummary, AccountRepositoryError>;
}
