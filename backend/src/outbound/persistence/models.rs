//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain aggregates
//! re-validate stored text so corrupt rows surface as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    CardText, Deck, DeckDraft, DeckId, DeckName, Flashcard, FlashcardDraft, FlashcardId, User,
    UserId, Username,
};

use super::schema::{decks, flashcards, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading credentials from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_privileged: bool,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<(User, String), String> {
        let username = Username::new(self.username).map_err(|err| err.to_string())?;
        Ok((
            User::new(UserId::from_uuid(self.id), username, self.is_privileged),
            self.password_hash,
        ))
    }
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_privileged: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Decks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = decks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeckRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DeckRow> for Deck {
    type Error = String;

    fn try_from(row: DeckRow) -> Result<Self, Self::Error> {
        Ok(Deck::new(DeckDraft {
            id: DeckId::new(row.id),
            name: DeckName::new(row.name).map_err(|err| err.to_string())?,
            description: row.description,
            owner: UserId::from_uuid(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = decks)]
pub(crate) struct NewDeckRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial deck update. `None` fields are left untouched; the nested option
/// on `description` distinguishes "leave" from "clear".
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = decks)]
pub(crate) struct DeckUpdate<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Flashcards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = flashcards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FlashcardRow {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub deck_id: i64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FlashcardRow> for Flashcard {
    type Error = String;

    fn try_from(row: FlashcardRow) -> Result<Self, Self::Error> {
        Ok(Flashcard::new(FlashcardDraft {
            id: FlashcardId::new(row.id),
            question: CardText::new(row.question).map_err(|err| err.to_string())?,
            answer: CardText::new(row.answer).map_err(|err| err.to_string())?,
            deck: DeckId::new(row.deck_id),
            owner: UserId::from_uuid(row.owner_id),
            created_at: row.created_at,
        }))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = flashcards)]
pub(crate) struct NewFlashcardRow<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub deck_id: i64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = flashcards)]
pub(crate) struct FlashcardUpdate<'a> {
    pub question: Option<&'a str>,
    pub answer: Option<&'a str>,
    pub deck_id: Option<i64>,
}
