//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed flashcard entities and the use-cases that
//! operate on them. Inbound adapters talk to services through the driving
//! ports in [`ports`]; services reach storage through the driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User, UserId, Username: account identity.
//! - Deck, Flashcard and their id, draft and change-set types.
//! - DeckService, FlashcardService, AccountService, DemoDataWipeService.

pub mod account_service;
pub mod auth;
pub mod deck;
pub mod deck_service;
pub mod demo_data;
pub mod error;
pub mod flashcard;
pub mod flashcard_service;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod validation;

#[cfg(test)]
pub(crate) mod service_test_support;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN, SignupRequest,
    SignupValidationError,
};
pub use self::deck::{
    DECK_NAME_MAX, Deck, DeckChanges, DeckDraft, DeckId, DeckName, DeckValidationError, NewDeck,
};
pub use self::deck_service::DeckService;
pub use self::demo_data::DemoDataWipeService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::flashcard::{
    CardText, EmptyCardText, Flashcard, FlashcardChanges, FlashcardDraft, FlashcardId,
    NewFlashcard,
};
pub use self::flashcard_service::FlashcardService;
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::trace_id::TraceId;
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};
pub use self::validation::FieldErrors;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use flashcards::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
