//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`, `*Service`) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod deck_command;
mod deck_query;
mod deck_repository;
mod flashcard_bulk_command;
mod flashcard_command;
mod flashcard_query;
mod flashcard_repository;
mod login_service;
mod signup_service;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials, WipeSummary,
};
#[cfg(test)]
pub use deck_command::MockDeckCommand;
pub use deck_command::{CreateDeckRequest, DeckCommand, UpdateDeckRequest, UpdateMode};
#[cfg(test)]
pub use deck_query::MockDeckQuery;
pub use deck_query::DeckQuery;
#[cfg(test)]
pub use deck_repository::MockDeckRepository;
pub use deck_repository::{DeckRepository, DeckRepositoryError};
#[cfg(test)]
pub use flashcard_bulk_command::MockFlashcardBulkCommand;
pub use flashcard_bulk_command::{BulkCreateOutcome, FlashcardBulkCommand};
#[cfg(test)]
pub use flashcard_command::MockFlashcardCommand;
pub use flashcard_command::{
    CreateFlashcardRequest, FlashcardCommand, FlashcardInput, UpdateFlashcardRequest,
};
#[cfg(test)]
pub use flashcard_query::MockFlashcardQuery;
pub use flashcard_query::FlashcardQuery;
#[cfg(test)]
pub use flashcard_repository::MockFlashcardRepository;
pub use flashcard_repository::{FlashcardRepository, FlashcardRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use signup_service::MockSignupService;
pub use signup_service::SignupService;
