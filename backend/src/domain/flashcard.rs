//! Flashcard entity and its write-side drafts.
//!
//! ## Invariants
//! - `question` and `answer` are non-empty once trimmed.
//! - `owner` equals the owner of `deck`; services only accept decks that
//!   resolve among the caller's own decks.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeckId, UserId};

/// Store-assigned flashcard identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashcardId(i64);

impl FlashcardId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FlashcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when card text is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("must not be empty")]
pub struct EmptyCardText;

/// Trimmed, non-empty question or answer text.
///
/// # Examples
/// ```
/// use flashcards::domain::CardText;
///
/// assert_eq!(CardText::new(" hola ").unwrap().as_ref(), "hola");
/// assert!(CardText::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardText(String);

impl CardText {
    /// Validate and construct card text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyCardText> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyCardText);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CardText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Persisted flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    id: FlashcardId,
    question: CardText,
    answer: CardText,
    deck: DeckId,
    owner: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for [`Flashcard::new`].
#[derive(Debug, Clone)]
pub struct FlashcardDraft {
    pub id: FlashcardId,
    pub question: CardText,
    pub answer: CardText,
    pub deck: DeckId,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    /// Assemble a flashcard from validated parts.
    pub fn new(draft: FlashcardDraft) -> Self {
        let FlashcardDraft {
            id,
            question,
            answer,
            deck,
            owner,
            created_at,
        } = draft;
        Self {
            id,
            question,
            answer,
            deck,
            owner,
            created_at,
        }
    }

    pub fn id(&self) -> FlashcardId {
        self.id
    }

    pub fn question(&self) -> &CardText {
        &self.question
    }

    pub fn answer(&self) -> &CardText {
        &self.answer
    }

    /// Deck the card belongs to.
    pub fn deck(&self) -> DeckId {
        self.deck
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Flashcard insert request handed to repositories. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlashcard {
    pub owner: UserId,
    pub deck: DeckId,
    pub question: CardText,
    pub answer: CardText,
    pub created_at: DateTime<Utc>,
}

/// Partial flashcard update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashcardChanges {
    pub question: Option<CardText>,
    pub answer: Option<CardText>,
    pub deck: Option<DeckId>,
}

impl FlashcardChanges {
    /// Whether the update touches no field at all.
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.deck.is_none()
    }
}
