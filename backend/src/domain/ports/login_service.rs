//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to turn credentials into a [`UserId`]
//! without knowing how accounts are stored.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Check that the account a session names still exists.
    ///
    /// Returns `unauthorized` once the account has been removed, for example
    /// by a demo-data wipe.
    async fn confirm_session(&self, user_id: &UserId) -> Result<UserId, Error>;
}
