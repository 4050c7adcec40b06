//! Deck domain service.
//!
//! Implements the deck driving ports on top of an owner-scoped
//! [`DeckRepository`]. The owner always comes from the authenticated caller,
//! never from request data.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateDeckRequest, DeckCommand, DeckQuery, DeckRepository, DeckRepositoryError,
    UpdateDeckRequest, UpdateMode,
};
use crate::domain::validation::FieldErrors;
use crate::domain::{Deck, DeckChanges, DeckId, DeckName, Error, NewDeck, UserId};

const REQUIRED: &str = "this field is required";

fn map_repository_error(error: DeckRepositoryError) -> Error {
    match error {
        DeckRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("deck repository unavailable: {message}"))
        }
        DeckRepositoryError::Query { message } => {
            Error::internal(format!("deck repository error: {message}"))
        }
    }
}

fn deck_not_found(deck_id: DeckId) -> Error {
    Error::not_found(format!("deck {deck_id} not found"))
}

/// Deck service implementing [`DeckCommand`] and [`DeckQuery`].
#[derive(Clone)]
pub struct DeckService<R> {
    decks: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DeckService<R> {
    /// Create a new service over the deck repository.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use flashcards::domain::DeckService;
    /// use flashcards::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let _service = DeckService::new(store, Arc::new(DefaultClock));
    /// ```
    pub fn new(decks: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { decks, clock }
    }
}

#[async_trait]
impl<R> DeckCommand for DeckService<R>
where
    R: DeckRepository,
{
    async fn create_deck(&self, request: CreateDeckRequest) -> Result<Deck, Error> {
        let CreateDeckRequest {
            owner,
            name,
            description,
        } = request;

        let mut errors = FieldErrors::new();
        let name = match name {
            Some(raw) => errors.check("name", DeckName::new(raw)),
            None => {
                errors.push("name", REQUIRED);
                None
            }
        };
        errors.into_result("invalid deck")?;
        let Some(name) = name else {
            return Err(Error::internal("validated deck name missing"));
        };

        let deck = self
            .decks
            .insert(&NewDeck {
                owner,
                name,
                description,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_repository_error)?;

        info!(deck_id = %deck.id(), owner = %deck.owner(), "deck created");
        Ok(deck)
    }

    async fn update_deck(&self, request: UpdateDeckRequest) -> Result<Deck, Error> {
        let UpdateDeckRequest {
            owner,
            deck_id,
            mode,
            name,
            description,
        } = request;

        let mut errors = FieldErrors::new();
        let name = match (name, mode) {
            (Some(raw), _) => errors.check("name", DeckName::new(raw)),
            (None, UpdateMode::Replace) => {
                errors.push("name", REQUIRED);
                None
            }
            (None, UpdateMode::Partial) => None,
        };
        errors.into_result("invalid deck")?;

        let changes = DeckChanges {
            name,
            description,
            updated_at: self.clock.utc(),
        };
        let deck = self
            .decks
            .update_for_owner(&owner, deck_id, &changes)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| deck_not_found(deck_id))?;

        debug!(deck_id = %deck_id, "deck updated");
        Ok(deck)
    }

    async fn delete_deck(&self, owner: &UserId, deck_id: DeckId) -> Result<(), Error> {
        let deleted = self
            .decks
            .delete_for_owner(owner, deck_id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(deck_not_found(deck_id));
        }
        info!(deck_id = %deck_id, owner = %owner, "deck deleted with its flashcards");
        Ok(())
    }
}

#[async_trait]
impl<R> DeckQuery for DeckService<R>
where
    R: DeckRepository,
{
    async fn list_decks(&self, owner: &UserId) -> Result<Vec<Deck>, Error> {
        self.decks
            .list_for_owner(owner)
            .await
            .map_err(map_repository_error)
    }

    async fn get_deck(&self, owner: &UserId, deck_id: DeckId) -> Result<Deck, Error> {
        self.decks
            .find_for_owner(owner, deck_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| deck_not_found(deck_id))
    }
}

#[cfg(test)]
#[path = "deck_service_tests.rs"]
mod tests;
