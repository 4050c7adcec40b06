//! Batch create and delete for [`FlashcardService`].

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use super::{
    FlashcardService, ValidatedInput, map_deck_repository_error, map_repository_error,
    unknown_deck_message, validate_input,
};
use crate::domain::ports::{
    BulkCreateOutcome, DeckRepository, FlashcardBulkCommand, FlashcardInput, FlashcardRepository,
};
use crate::domain::validation::FieldErrors;
use crate::domain::{DeckId, Error, NewFlashcard, UserId};

impl<F, D> FlashcardService<F, D>
where
    D: DeckRepository,
{
    async fn owned_deck_ids(&self, owner: &UserId) -> Result<HashSet<DeckId>, Error> {
        let decks = self
            .decks
            .list_for_owner(owner)
            .await
            .map_err(map_deck_repository_error)?;
        Ok(decks.iter().map(|deck| deck.id()).collect())
    }
}

/// Record one batch entry's field errors under its input position.
fn record_failure(failures: &mut Vec<Value>, index: usize, errors: &FieldErrors) {
    failures.push(json!({ "index": index, "fields": errors.to_value() }));
}

#[async_trait]
impl<F, D> FlashcardBulkCommand for FlashcardService<F, D>
where
    F: FlashcardRepository,
    D: DeckRepository,
{
    async fn bulk_create(
        &self,
        owner: &UserId,
        records: Vec<FlashcardInput>,
    ) -> Result<BulkCreateOutcome, Error> {
        if records.is_empty() {
            return Ok(BulkCreateOutcome { ids: Vec::new() });
        }

        let owned = self.owned_deck_ids(owner).await?;
        let created_at = self.clock.utc();
        let mut failures = Vec::new();
        let mut cards = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let mut errors = FieldErrors::new();
            let validated = validate_input(record, true, &mut errors);
            if let Some(deck) = validated.deck.filter(|deck| !owned.contains(deck)) {
                errors.push("deck", unknown_deck_message(deck));
            }
            if !errors.is_empty() {
                record_failure(&mut failures, index, &errors);
                continue;
            }
            if let ValidatedInput {
                question: Some(question),
                answer: Some(answer),
                deck: Some(deck),
            } = validated
            {
                cards.push(NewFlashcard {
                    owner: owner.clone(),
                    deck,
                    question,
                    answer,
                    created_at,
                });
            }
        }

        if !failures.is_empty() {
            return Err(Error::invalid_request("invalid flashcard batch")
                .with_details(json!({ "records": failures })));
        }

        let ids = self
            .cards
            .insert_batch(&cards)
            .await
            .map_err(map_repository_error)?;

        info!(owner = %owner, created = ids.len(), "flashcards bulk created");
        Ok(BulkCreateOutcome { ids })
    }

    async fn bulk_delete(&self, owner: &UserId, deck: DeckId) -> Result<u64, Error> {
        let deleted = self
            .cards
            .delete_in_deck_for_owner(owner, deck)
            .await
            .map_err(map_repository_error)?;
        info!(owner = %owner, deck_id = %deck, deleted, "flashcards bulk deleted");
        Ok(deleted)
    }
}
