//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain
//! aggregates. Row structs (`models.rs`) and table definitions (`schema.rs`)
//! stay private to this module. Connections come from a `bb8` pool driven
//! by `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! use flashcards::outbound::persistence::{DbPool, DieselDeckRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), flashcards::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/flashcards")).await?;
//! let _decks = DieselDeckRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_deck_repository;
mod diesel_error_mapping;
mod diesel_flashcard_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_deck_repository::DieselDeckRepository;
pub use diesel_flashcard_repository::DieselFlashcardRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
