//! Driving port for self-service account registration.

use async_trait::async_trait;

use crate::domain::{Error, SignupRequest, User};

/// Domain use-case port for creating ordinary (non-privileged) accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Register a new account; duplicate usernames fail with `invalid_request`.
    async fn register(&self, request: &SignupRequest) -> Result<User, Error>;
}
