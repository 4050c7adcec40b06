//! Account registration and authentication.
//!
//! Password digests are derived and checked on the blocking thread pool so
//! key stretching never stalls the async executor.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, LoginService, NewAccount, SignupService,
};
use crate::domain::{Error, LoginCredentials, PasswordHash, SignupRequest, User, UserId, Username};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const SESSION_ENDED: &str = "login required";
const USERNAME_TAKEN: &str = "a user with that username already exists";

fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateUsername { .. } => {
            Error::invalid_request("invalid signup")
                .with_details(json!({ "fields": { "username": [USERNAME_TAKEN] } }))
        }
    }
}

async fn hash_password(password: &str) -> Result<String, Error> {
    let password = zeroize::Zeroizing::new(password.to_owned());
    let digest = tokio::task::spawn_blocking(move || PasswordHash::derive(password.as_str()))
        .await
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(digest.as_str().to_owned())
}

async fn verify_password(hash: PasswordHash, candidate: &str) -> Result<bool, Error> {
    let candidate = zeroize::Zeroizing::new(candidate.to_owned());
    tokio::task::spawn_blocking(move || hash.verify(candidate.as_str()))
        .await
        .map_err(|err| Error::internal(format!("password verification failed: {err}")))
}

/// Account service implementing [`LoginService`] and [`SignupService`].
#[derive(Clone)]
pub struct AccountService<A> {
    accounts: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A> AccountService<A> {
    pub fn new(accounts: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self { accounts, clock }
    }
}

impl<A> AccountService<A>
where
    A: AccountRepository,
{
    async fn create_account(
        &self,
        username: Username,
        password: &str,
        is_privileged: bool,
    ) -> Result<User, Error> {
        let password_hash = hash_password(password).await?;
        let user = self
            .accounts
            .create(&NewAccount {
                id: UserId::random(),
                username,
                password_hash,
                is_privileged,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id(), privileged = is_privileged, "account created");
        Ok(user)
    }

    /// Create a privileged account that survives demo-data wipes.
    ///
    /// Bypasses the signup password policy so operators can provision
    /// accounts from the admin tool.
    pub async fn provision_privileged(
        &self,
        username: Username,
        password: &str,
    ) -> Result<User, Error> {
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        self.create_account(username, password, true).await
    }
}

#[async_trait]
impl<A> SignupService for AccountService<A>
where
    A: AccountRepository,
{
    async fn register(&self, request: &SignupRequest) -> Result<User, Error> {
        self.create_account(request.username().clone(), request.password(), false)
            .await
    }
}

#[async_trait]
impl<A> LoginService for AccountService<A>
where
    A: AccountRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .accounts
            .find_credentials(credentials.username())
            .await
            .map_err(map_repository_error)?;
        let account = stored.and_then(|stored| {
            PasswordHash::parse(&stored.password_hash)
                .inspect_err(|err| {
                    warn!(user_id = %stored.user.id(), error = %err, "stored password digest unreadable");
                })
                .ok()
                .map(|hash| (stored.user.id().clone(), hash))
        });

        // Unknown accounts still pay for one verification.
        let (user_id, digest) = match account {
            Some((user_id, hash)) => (Some(user_id), Some(hash)),
            None => (None, PasswordHash::decoy()),
        };
        let verified = match digest {
            Some(hash) => verify_password(hash, credentials.password()).await?,
            None => false,
        };

        match user_id {
            Some(user_id) if verified => Ok(user_id),
            _ => Err(Error::unauthorized(INVALID_CREDENTIALS)),
        }
    }

    async fn confirm_session(&self, user_id: &UserId) -> Result<UserId, Error> {
        let user = self
            .accounts
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?;
        match user {
            Some(user) => Ok(user.id().clone()),
            None => {
                warn!(%user_id, "session refers to a removed account");
                Err(Error::unauthorized(SESSION_ENDED))
            }
        }
    }
}
