//! HTTP inbound adapter exposing the REST endpoints.
//!
//! [`configure_api`] registers every `/api/v1` handler together with the
//! extractor configuration that turns malformed bodies and query strings
//! into the standard error payload.

pub mod accounts;
pub mod bulk;
pub mod decks;
pub mod error;
pub mod flashcards;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api/v1` handlers on a scope.
///
/// The batch routes are registered before `/flashcards/{id}` so their fixed
/// segments win.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use flashcards::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::logout)
        .service(decks::list_decks)
        .service(decks::create_deck)
        .service(decks::get_deck)
        .service(decks::replace_deck)
        .service(decks::update_deck)
        .service(decks::delete_deck)
        .service(bulk::bulk_create)
        .service(bulk::bulk_delete)
        .service(flashcards::list_flashcards)
        .service(flashcards::create_flashcard)
        .service(flashcards::get_flashcard)
        .service(flashcards::replace_flashcard)
        .service(flashcards::update_flashcard)
        .service(flashcards::delete_flashcard);
}
