//! Shared fixtures for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    CardText, Deck, DeckDraft, DeckId, DeckName, Flashcard, FlashcardDraft, FlashcardId, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn sample_deck(owner: &UserId, id: i64, name: &str) -> Deck {
    Deck::new(DeckDraft {
        id: DeckId::new(id),
        name: DeckName::new(name).expect("valid deck name"),
        description: None,
        owner: owner.clone(),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    })
}

pub(crate) fn sample_card(owner: &UserId, id: i64, deck: i64) -> Flashcard {
    Flashcard::new(FlashcardDraft {
        id: FlashcardId::new(id),
        question: CardText::new(format!("question {id}")).expect("valid question"),
        answer: CardText::new(format!("answer {id}")).expect("valid answer"),
        deck: DeckId::new(deck),
        owner: owner.clone(),
        created_at: fixture_timestamp(),
    })
}
