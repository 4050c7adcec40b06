//! PostgreSQL-backed `FlashcardRepository` implementation using Diesel ORM.
//!
//! Batch inserts use multi-row `INSERT ... RETURNING id` statements inside
//! one transaction, so either every card lands or none does. Each statement
//! stays under PostgreSQL's bind parameter limit.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{FlashcardRepository, FlashcardRepositoryError};
use crate::domain::{DeckId, Flashcard, FlashcardChanges, FlashcardId, NewFlashcard, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{FlashcardRow, FlashcardUpdate, NewFlashcardRow};
use super::schema::flashcards;
use super::{DbPool, PoolError};

/// PostgreSQL rejects statements with more bind parameters than this.
const MAX_BIND_PARAMS: usize = 65_535;
/// Columns bound per [`NewFlashcardRow`].
const PARAMS_PER_ROW: usize = 5;
/// Rows written by one `INSERT` of a batch.
const ROWS_PER_STATEMENT: usize = MAX_BIND_PARAMS / PARAMS_PER_ROW;

/// Diesel-backed flashcard storage.
#[derive(Clone)]
pub struct DieselFlashcardRepository {
    pool: DbPool,
}

impl DieselFlashcardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> FlashcardRepositoryError {
    map_pool_error(error, FlashcardRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> FlashcardRepositoryError {
    map_diesel_error(
        error,
        FlashcardRepositoryError::query,
        FlashcardRepositoryError::connection,
    )
}

fn to_domain(row: FlashcardRow) -> Result<Flashcard, FlashcardRepositoryError> {
    let id = row.id;
    Flashcard::try_from(row).map_err(|reason| {
        warn!(flashcard_id = id, %reason, "stored flashcard row failed validation");
        FlashcardRepositoryError::query("invalid flashcard row")
    })
}

fn new_row(card: &NewFlashcard) -> NewFlashcardRow<'_> {
    NewFlashcardRow {
        question: card.question.as_ref(),
        answer: card.answer.as_ref(),
        deck_id: card.deck.get(),
        owner_id: *card.owner.as_uuid(),
        created_at: card.created_at,
    }
}

#[async_trait]
impl FlashcardRepository for DieselFlashcardRepository {
    async fn list_for_owner(
        &self,
        owner: &UserId,
        deck: Option<DeckId>,
    ) -> Result<Vec<Flashcard>, FlashcardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = flashcards::table
            .filter(flashcards::owner_id.eq(*owner.as_uuid()))
            .into_boxed();
        if let Some(deck) = deck {
            query = query.filter(flashcards::deck_id.eq(deck.get()));
        }
        let rows: Vec<FlashcardRow> = query
            .order(flashcards::id.asc())
            .select(FlashcardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
    ) -> Result<Option<Flashcard>, FlashcardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<FlashcardRow> = flashcards::table
            .filter(flashcards::id.eq(id.get()))
            .filter(flashcards::owner_id.eq(owner.as_uuid()))
            .select(FlashcardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn insert(&self, card: &NewFlashcard) -> Result<Flashcard, FlashcardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let stored: FlashcardRow = diesel::insert_into(flashcards::table)
            .values(&new_row(card))
            .returning(FlashcardRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        to_domain(stored)
    }

    async fn insert_batch(
        &self,
        cards: &[NewFlashcard],
    ) -> Result<Vec<FlashcardId>, FlashcardRepositoryError> {
        if cards.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<NewFlashcardRow<'_>> = cards.iter().map(new_row).collect();
        let ids: Vec<i64> = conn
            .transaction(|conn| {
                async move {
                    let mut ids = Vec::with_capacity(rows.len());
                    for chunk in rows.chunks(ROWS_PER_STATEMENT) {
                        let inserted: Vec<i64> = diesel::insert_into(flashcards::table)
                            .values(chunk)
                            .returning(flashcards::id)
                            .get_results(conn)
                            .await?;
                        ids.extend(inserted);
                    }
                    Ok(ids)
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(FlashcardId::new).collect())
    }

    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
        changes: &FlashcardChanges,
    ) -> Result<Option<Flashcard>, FlashcardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let update = FlashcardUpdate {
            question: changes.question.as_ref().map(AsRef::as_ref),
            answer: changes.answer.as_ref().map(AsRef::as_ref),
            deck_id: changes.deck.map(DeckId::get),
        };
        let row: Option<FlashcardRow> = diesel::update(
            flashcards::table
                .filter(flashcards::id.eq(id.get()))
                .filter(flashcards::owner_id.eq(owner.as_uuid())),
        )
        .set(&update)
        .returning(FlashcardRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: FlashcardId,
    ) -> Result<bool, FlashcardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            flashcards::table
                .filter(flashcards::id.eq(id.get()))
                .filter(flashcards::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_in_deck_for_owner(
        &self,
        owner: &UserId,
        deck: DeckId,
    ) -> Result<u64, FlashcardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            flashcards::table
                .filter(flashcards::deck_id.eq(deck.get()))
                .filter(flashcards::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::CardText;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn new_rows_borrow_validated_text() {
        let card = NewFlashcard {
            owner: UserId::random(),
            deck: DeckId::new(3),
            question: CardText::new("Capital of France?").expect("question"),
            answer: CardText::new("Paris").expect("answer"),
            created_at: Utc::now(),
        };

        let row = new_row(&card);

        assert_eq!(row.question, "Capital of France?");
        assert_eq!(row.deck_id, 3);
        assert_eq!(&row.owner_id, card.owner.as_uuid());
    }

    #[rstest]
    fn batches_split_below_the_bind_parameter_limit() {
        assert!(ROWS_PER_STATEMENT * PARAMS_PER_ROW <= MAX_BIND_PARAMS);

        let rows = vec![(); ROWS_PER_STATEMENT + 1];
        let statements: Vec<usize> = rows.chunks(ROWS_PER_STATEMENT).map(<[()]>::len).collect();

        assert_eq!(statements, vec![ROWS_PER_STATEMENT, 1]);
    }
}
