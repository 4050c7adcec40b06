//! PostgreSQL-backed `DeckRepository` implementation using Diesel ORM.
//!
//! Every statement filters on `owner_id`, so a foreign deck is
//! indistinguishable from a missing one.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{DeckRepository, DeckRepositoryError};
use crate::domain::{Deck, DeckChanges, DeckId, NewDeck, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DeckRow, DeckUpdate, NewDeckRow};
use super::schema::decks;
use super::{DbPool, PoolError};

/// Diesel-backed deck storage.
#[derive(Clone)]
pub struct DieselDeckRepository {
    pool: DbPool,
}

impl DieselDeckRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> DeckRepositoryError {
    map_pool_error(error, DeckRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> DeckRepositoryError {
    map_diesel_error(
        error,
        DeckRepositoryError::query,
        DeckRepositoryError::connection,
    )
}

fn to_domain(row: DeckRow) -> Result<Deck, DeckRepositoryError> {
    let id = row.id;
    Deck::try_from(row).map_err(|reason| {
        warn!(deck_id = id, %reason, "stored deck row failed validation");
        DeckRepositoryError::query("invalid deck row")
    })
}

#[async_trait]
impl DeckRepository for DieselDeckRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<DeckRow> = decks::table
            .filter(decks::owner_id.eq(owner.as_uuid()))
            .order(decks::id.asc())
            .select(DeckRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<DeckRow> = decks::table
            .filter(decks::id.eq(id.get()))
            .filter(decks::owner_id.eq(owner.as_uuid()))
            .select(DeckRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn insert(&self, deck: &NewDeck) -> Result<Deck, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewDeckRow {
            name: deck.name.as_ref(),
            description: deck.description.as_deref(),
            owner_id: *deck.owner.as_uuid(),
            created_at: deck.created_at,
            updated_at: deck.created_at,
        };
        let stored: DeckRow = diesel::insert_into(decks::table)
            .values(&row)
            .returning(DeckRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        to_domain(stored)
    }

    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
        changes: &DeckChanges,
    ) -> Result<Option<Deck>, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let update = DeckUpdate {
            name: changes.name.as_ref().map(AsRef::as_ref),
            description: changes.description.as_ref().map(Option::as_deref),
            updated_at: changes.updated_at,
        };
        let row: Option<DeckRow> = diesel::update(
            decks::table
                .filter(decks::id.eq(id.get()))
                .filter(decks::owner_id.eq(owner.as_uuid())),
        )
        .set(&update)
        .returning(DeckRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: DeckId,
    ) -> Result<bool, DeckRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            decks::table
                .filter(decks::id.eq(id.get()))
                .filter(decks::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
