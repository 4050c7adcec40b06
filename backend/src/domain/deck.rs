//! Deck entity and its write-side drafts.
//!
//! A deck is a named collection of flashcards owned by exactly one user.
//! Deleting a deck removes its flashcards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum deck name length, in characters.
pub const DECK_NAME_MAX: usize = 100;

/// Store-assigned deck identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(i64);

impl DeckId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeckId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Validation errors for deck fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Trimmed, non-empty deck name of at most [`DECK_NAME_MAX`] characters.
///
/// # Examples
/// ```
/// use flashcards::domain::DeckName;
///
/// let name = DeckName::new("  Spanish verbs ").unwrap();
/// assert_eq!(name.as_ref(), "Spanish verbs");
/// assert!(DeckName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckName(String);

impl DeckName {
    /// Validate and construct a deck name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DeckValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DeckValidationError::EmptyName);
        }
        if trimmed.chars().count() > DECK_NAME_MAX {
            return Err(DeckValidationError::NameTooLong { max: DECK_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DeckName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Persisted deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    name: DeckName,
    description: Option<String>,
    owner: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for [`Deck::new`].
#[derive(Debug, Clone)]
pub struct DeckDraft {
    pub id: DeckId,
    pub name: DeckName,
    pub description: Option<String>,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    /// Assemble a deck from validated parts.
    pub fn new(draft: DeckDraft) -> Self {
        let DeckDraft {
            id,
            name,
            description,
            owner,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            name,
            description,
            owner,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> DeckId {
        self.id
    }

    pub fn name(&self) -> &DeckName {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Deck insert request handed to repositories. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeck {
    pub owner: UserId,
    pub name: DeckName,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial deck update. `None` leaves a field untouched; `Some(None)` clears
/// the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckChanges {
    pub name: Option<DeckName>,
    pub description: Option<Option<String>>,
    pub updated_at: DateTime<Utc>,
}
