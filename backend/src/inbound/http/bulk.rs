//! Batch flashcard endpoints.
//!
//! ```text
//! POST   /api/v1/flashcards/bulk_create   [{"question":"..","answer":"..","deck":7}, ...]
//! DELETE /api/v1/flashcards/bulk_delete?deck=7
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{DeckId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::flashcards::{DeckFilter, FlashcardPayload};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Result of `POST /flashcards/bulk_create`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateResponse {
    #[schema(example = 2)]
    pub created: usize,
    /// Ids of the new cards in request order.
    pub ids: Vec<i64>,
}

/// Result of `DELETE /flashcards/bulk_delete`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    #[schema(example = 12)]
    pub deleted: u64,
}

fn deck_error(message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "fields": { "deck": [message] } }))
}

/// Parse the mandatory `deck` parameter of a bulk delete.
fn required_deck(filter: &DeckFilter) -> Result<DeckId, Error> {
    let raw = filter
        .deck
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| deck_error("deck id required"))?;
    raw.parse()
        .map_err(|_| deck_error("deck must be an integer id"))
}

/// Create many flashcards at once.
///
/// The whole batch is validated first; if any record is invalid nothing is
/// written and the error details list the failures by index.
#[utoipa::path(
    post,
    path = "/api/v1/flashcards/bulk_create",
    request_body = [FlashcardPayload],
    responses(
        (status = 201, description = "Every record was created", body = BulkCreateResponse),
        (status = 400, description = "At least one record was rejected", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "bulkCreateFlashcards",
    security(("SessionCookie" = []))
)]
#[post("/flashcards/bulk_create")]
pub async fn bulk_create(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Vec<FlashcardPayload>>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let records = payload.into_inner().into_iter().map(Into::into).collect();
    let outcome = state.bulk.bulk_create(&owner, records).await?;
    Ok(HttpResponse::Created().json(BulkCreateResponse {
        created: outcome.created(),
        ids: outcome.ids.iter().map(|id| id.get()).collect(),
    }))
}

/// Delete every card the caller has in one deck.
///
/// A foreign or unknown deck deletes nothing and still succeeds.
#[utoipa::path(
    delete,
    path = "/api/v1/flashcards/bulk_delete",
    params(("deck" = i64, Query, description = "Deck whose cards are deleted")),
    responses(
        (status = 200, description = "Cards deleted", body = BulkDeleteResponse),
        (status = 400, description = "Missing or malformed deck id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "bulkDeleteFlashcards",
    security(("SessionCookie" = []))
)]
#[delete("/flashcards/bulk_delete")]
pub async fn bulk_delete(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: DeckFilter,
) -> ApiResult<web::Json<BulkDeleteResponse>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let deck = required_deck(&filter)?;
    let deleted = state.bulk.bulk_delete(&owner, deck).await?;
    Ok(web::Json(BulkDeleteResponse { deleted }))
}

#[cfg(test)]
#[path = "bulk_tests.rs"]
mod tests;
