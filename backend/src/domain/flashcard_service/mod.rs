//! Flashcard domain service.
//!
//! Implements the single-card driving ports here and the batch port in
//! [`bulk`]. Every card must live in a deck the caller owns; a deck id that
//! does not resolve among the caller's decks is a validation failure on the
//! `deck` field, whether the deck is missing or belongs to someone else.

mod bulk;

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateFlashcardRequest, DeckRepository, DeckRepositoryError, FlashcardCommand,
    FlashcardInput, FlashcardQuery, FlashcardRepository, FlashcardRepositoryError,
    UpdateFlashcardRequest, UpdateMode,
};
use crate::domain::validation::FieldErrors;
use crate::domain::{
    CardText, DeckId, Error, Flashcard, FlashcardChanges, FlashcardId, NewFlashcard, UserId,
};

const REQUIRED: &str = "this field is required";

fn map_repository_error(error: FlashcardRepositoryError) -> Error {
    match error {
        FlashcardRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("flashcard repository unavailable: {message}"))
        }
        FlashcardRepositoryError::Query { message } => {
            Error::internal(format!("flashcard repository error: {message}"))
        }
    }
}

fn map_deck_repository_error(error: DeckRepositoryError) -> Error {
    match error {
        DeckRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("deck repository unavailable: {message}"))
        }
        DeckRepositoryError::Query { message } => {
            Error::internal(format!("deck repository error: {message}"))
        }
    }
}

fn flashcard_not_found(flashcard_id: FlashcardId) -> Error {
    Error::not_found(format!("flashcard {flashcard_id} not found"))
}

fn unknown_deck_message(deck: DeckId) -> String {
    format!("deck {deck} does not exist")
}

/// Field-validated card content, before deck ownership is checked.
struct ValidatedInput {
    question: Option<CardText>,
    answer: Option<CardText>,
    deck: Option<DeckId>,
}

/// Validate text fields and presence. `require_all` demands every field.
fn validate_input(
    input: FlashcardInput,
    require_all: bool,
    errors: &mut FieldErrors,
) -> ValidatedInput {
    let FlashcardInput {
        question,
        answer,
        deck,
    } = input;

    let mut text = |field: &'static str, raw: Option<String>| match raw {
        Some(raw) => errors.check(field, CardText::new(raw)),
        None => {
            if require_all {
                errors.push(field, REQUIRED);
            }
            None
        }
    };
    let question = text("question", question);
    let answer = text("answer", answer);
    if deck.is_none() && require_all {
        errors.push("deck", REQUIRED);
    }

    ValidatedInput {
        question,
        answer,
        deck,
    }
}

/// Flashcard service implementing the flashcard driving ports.
#[derive(Clone)]
pub struct FlashcardService<F, D> {
    cards: Arc<F>,
    decks: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<F, D> FlashcardService<F, D> {
    /// Create a new service over the flashcard and deck repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use flashcards::domain::FlashcardService;
    /// use flashcards::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let _service = FlashcardService::new(store.clone(), store, Arc::new(DefaultClock));
    /// ```
    pub fn new(cards: Arc<F>, decks: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cards,
            decks,
            clock,
        }
    }
}

impl<F, D> FlashcardService<F, D>
where
    D: DeckRepository,
{
    /// Record a `deck` field error unless `deck` belongs to `owner`.
    async fn check_owned_deck(
        &self,
        owner: &UserId,
        deck: DeckId,
        errors: &mut FieldErrors,
    ) -> Result<(), Error> {
        let found = self
            .decks
            .find_for_owner(owner, deck)
            .await
            .map_err(map_deck_repository_error)?;
        if found.is_none() {
            errors.push("deck", unknown_deck_message(deck));
        }
        Ok(())
    }
}

#[async_trait]
impl<F, D> FlashcardCommand for FlashcardService<F, D>
where
    F: FlashcardRepository,
    D: DeckRepository,
{
    async fn create_flashcard(&self, request: CreateFlashcardRequest) -> Result<Flashcard, Error> {
        let CreateFlashcardRequest { owner, input } = request;

        let mut errors = FieldErrors::new();
        let validated = validate_input(input, true, &mut errors);
        if let Some(deck) = validated.deck {
            self.check_owned_deck(&owner, deck, &mut errors).await?;
        }
        errors.into_result("invalid flashcard")?;

        let ValidatedInput {
            question: Some(question),
            answer: Some(answer),
            deck: Some(deck),
        } = validated
        else {
            return Err(Error::internal("validated flashcard fields missing"));
        };

        let card = self
            .cards
            .insert(&NewFlashcard {
                owner,
                deck,
                question,
                answer,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_repository_error)?;

        info!(flashcard_id = %card.id(), deck_id = %card.deck(), "flashcard created");
        Ok(card)
    }

    async fn update_flashcard(&self, request: UpdateFlashcardRequest) -> Result<Flashcard, Error> {
        let UpdateFlashcardRequest {
            owner,
            flashcard_id,
            mode,
            input,
        } = request;

        let mut errors = FieldErrors::new();
        let validated = validate_input(input, mode == UpdateMode::Replace, &mut errors);
        if let Some(deck) = validated.deck {
            self.check_owned_deck(&owner, deck, &mut errors).await?;
        }
        errors.into_result("invalid flashcard")?;

        let changes = FlashcardChanges {
            question: validated.question,
            answer: validated.answer,
            deck: validated.deck,
        };
        let card = if changes.is_empty() {
            self.cards
                .find_for_owner(&owner, flashcard_id)
                .await
                .map_err(map_repository_error)?
        } else {
            self.cards
                .update_for_owner(&owner, flashcard_id, &changes)
                .await
                .map_err(map_repository_error)?
        };
        let card = card.ok_or_else(|| flashcard_not_found(flashcard_id))?;

        debug!(flashcard_id = %flashcard_id, "flashcard updated");
        Ok(card)
    }

    async fn delete_flashcard(
        &self,
        owner: &UserId,
        flashcard_id: FlashcardId,
    ) -> Result<(), Error> {
        let deleted = self
            .cards
            .delete_for_owner(owner, flashcard_id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(flashcard_not_found(flashcard_id));
        }
        debug!(flashcard_id = %flashcard_id, "flashcard deleted");
        Ok(())
    }
}

#[async_trait]
impl<F, D> FlashcardQuery for FlashcardService<F, D>
where
    F: FlashcardRepository,
    D: DeckRepository,
{
    async fn list_flashcards(
        &self,
        owner: &UserId,
        deck: Option<DeckId>,
    ) -> Result<Vec<Flashcard>, Error> {
        self.cards
            .list_for_owner(owner, deck)
            .await
            .map_err(map_repository_error)
    }

    async fn get_flashcard(
        &self,
        owner: &UserId,
        flashcard_id: FlashcardId,
    ) -> Result<Flashcard, Error> {
        self.cards
            .find_for_owner(owner, flashcard_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| flashcard_not_found(flashcard_id))
    }
}
