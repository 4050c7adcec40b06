//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::{User, UserId};
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials, WipeSummary,
};

use super::DbPool;
use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::schema::{decks, flashcards, users};

/// Diesel-backed account storage.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::PoolError) -> AccountRepositoryError {
    map_pool_error(error, AccountRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

/// Subquery selecting the accounts a demo-data wipe removes.
fn non_privileged_ids() -> users::BoxedQuery<'static, diesel::pg::Pg, diesel::sql_types::Uuid> {
    users::table
        .filter(users::is_privileged.eq(false))
        .select(users::id)
        .into_boxed()
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<User, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *account.id.as_uuid(),
            username: account.username.as_ref(),
            password_hash: &account.password_hash,
            is_privileged: account.is_privileged,
            created_at: account.created_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AccountRepositoryError::duplicate_username(account.username.as_ref())
                } else {
                    diesel_error(err)
                }
            })?;

        Ok(User::new(
            account.id.clone(),
            account.username.clone(),
            account.is_privileged,
        ))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let (user, password_hash) = row.into_user().map_err(|reason| {
            warn!(%reason, "stored account row failed validation");
            AccountRepositoryError::query("invalid account row")
        })?;
        Ok(Some(StoredCredentials {
            user,
            password_hash,
        }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| {
            row.into_user().map(|(user, _)| user).map_err(|reason| {
                warn!(%reason, "stored account row failed validation");
                AccountRepositoryError::query("invalid account row")
            })
        })
        .transpose()
    }

    async fn delete_non_privileged(&self) -> Result<WipeSummary, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction(|conn| {
            async move {
                let deck_count: i64 = decks::table
                    .filter(decks::owner_id.eq_any(non_privileged_ids()))
                    .count()
                    .get_result(conn)
                    .await?;
                let card_count: i64 = flashcards::table
                    .filter(flashcards::owner_id.eq_any(non_privileged_ids()))
                    .count()
                    .get_result(conn)
                    .await?;
                let user_count = diesel::delete(users::table.filter(users::is_privileged.eq(false)))
                    .execute(conn)
                    .await?;

                Ok(WipeSummary {
                    users: u64::try_from(user_count).unwrap_or_default(),
                    decks: count(deck_count),
                    flashcards: count(card_count),
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }
}
