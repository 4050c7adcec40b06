//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler and the health checks, the
//! request and response DTOs, and the error envelope. Swagger UI serves it in
//! debug builds and `openapi-dump` writes it out for external tooling.

use crate::inbound::http::accounts::{CredentialsRequest, SignupResponse};
use crate::inbound::http::bulk::{BulkCreateResponse, BulkDeleteResponse};
use crate::inbound::http::decks::{DeckPatchPayload, DeckPayload, DeckResponse};
use crate::inbound::http::flashcards::{FlashcardPayload, FlashcardResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Flashcards API",
        description = "Per-user decks and flashcards behind a session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::decks::list_decks,
        crate::inbound::http::decks::create_deck,
        crate::inbound::http::decks::get_deck,
        crate::inbound::http::decks::replace_deck,
        crate::inbound::http::decks::update_deck,
        crate::inbound::http::decks::delete_deck,
        crate::inbound::http::flashcards::list_flashcards,
        crate::inbound::http::flashcards::create_flashcard,
        crate::inbound::http::flashcards::get_flashcard,
        crate::inbound::http::flashcards::replace_flashcard,
        crate::inbound::http::flashcards::update_flashcard,
        crate::inbound::http::flashcards::delete_flashcard,
        crate::inbound::http::bulk::bulk_create,
        crate::inbound::http::bulk::bulk_delete,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CredentialsRequest,
        SignupResponse,
        DeckResponse,
        DeckPayload,
        DeckPatchPayload,
        FlashcardResponse,
        FlashcardPayload,
        BulkCreateResponse,
        BulkDeleteResponse,
    )),
    tags(
        (name = "accounts", description = "Signup and session management"),
        (name = "decks", description = "Decks owned by the session user"),
        (name = "flashcards", description = "Flashcards owned by the session user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
