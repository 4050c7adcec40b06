//! Deck API handlers.
//!
//! ```text
//! GET    /api/v1/decks
//! POST   /api/v1/decks        {"name":"Capitals","description":"Europe"}
//! GET    /api/v1/decks/{id}
//! PUT    /api/v1/decks/{id}   {"name":"Capitals"}
//! PATCH  /api/v1/decks/{id}   {"description":null}
//! DELETE /api/v1/decks/{id}
//! ```
//!
//! Every handler resolves the caller from the session first; decks owned by
//! someone else answer `404` exactly like decks that do not exist.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CreateDeckRequest, UpdateDeckRequest, UpdateMode};
use crate::domain::{Deck, DeckId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Deck representation returned by the API.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Capitals")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, format = Uuid)]
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id().get(),
            name: deck.name().as_ref().to_owned(),
            description: deck.description().map(str::to_owned),
            owner: deck.owner().clone(),
            created_at: deck.created_at(),
            updated_at: deck.updated_at(),
        }
    }
}

/// Body for `POST /decks` and `PUT /decks/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Body for `PATCH /decks/{id}`.
///
/// An explicit `"description": null` clears the description, while an
/// omitted key leaves it unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeckPatchPayload {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
}

/// Marks a key that appeared in the body, even with a `null` value.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn decks_response(decks: Vec<Deck>) -> Vec<DeckResponse> {
    decks.into_iter().map(DeckResponse::from).collect()
}

/// List the caller's decks in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/decks",
    responses(
        (status = 200, description = "Caller's decks", body = [DeckResponse]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 429, description = "Rate limited", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "listDecks",
    security(("SessionCookie" = []))
)]
#[get("/decks")]
pub async fn list_decks(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DeckResponse>>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let decks = state.decks_query.list_decks(&owner).await?;
    Ok(web::Json(decks_response(decks)))
}

/// Create a deck owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/decks",
    request_body = DeckPayload,
    responses(
        (status = 201, description = "Deck created", body = DeckResponse),
        (status = 400, description = "Invalid deck", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "createDeck",
    security(("SessionCookie" = []))
)]
#[post("/decks")]
pub async fn create_deck(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DeckPayload>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let DeckPayload { name, description } = payload.into_inner();
    let deck = state
        .decks
        .create_deck(CreateDeckRequest {
            owner,
            name,
            description,
        })
        .await?;
    Ok(HttpResponse::Created().json(DeckResponse::from(deck)))
}

/// Fetch one of the caller's decks.
#[utoipa::path(
    get,
    path = "/api/v1/decks/{id}",
    params(("id" = i64, Path, description = "Deck id")),
    responses(
        (status = 200, description = "Deck", body = DeckResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such deck for this user", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "getDeck",
    security(("SessionCookie" = []))
)]
#[get("/decks/{id}")]
pub async fn get_deck(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DeckResponse>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let deck = state
        .decks_query
        .get_deck(&owner, DeckId::new(path.into_inner()))
        .await?;
    Ok(web::Json(deck.into()))
}

/// Replace one of the caller's decks; `name` is required.
#[utoipa::path(
    put,
    path = "/api/v1/decks/{id}",
    params(("id" = i64, Path, description = "Deck id")),
    request_body = DeckPayload,
    responses(
        (status = 200, description = "Deck replaced", body = DeckResponse),
        (status = 400, description = "Invalid deck", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such deck for this user", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "replaceDeck",
    security(("SessionCookie" = []))
)]
#[put("/decks/{id}")]
pub async fn replace_deck(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<DeckPayload>,
) -> ApiResult<web::Json<DeckResponse>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let DeckPayload { name, description } = payload.into_inner();
    let deck = state
        .decks
        .update_deck(UpdateDeckRequest {
            owner,
            deck_id: DeckId::new(path.into_inner()),
            mode: UpdateMode::Replace,
            name,
            description: Some(description),
        })
        .await?;
    Ok(web::Json(deck.into()))
}

/// Change a subset of a deck's fields.
#[utoipa::path(
    patch,
    path = "/api/v1/decks/{id}",
    params(("id" = i64, Path, description = "Deck id")),
    request_body = DeckPatchPayload,
    responses(
        (status = 200, description = "Deck updated", body = DeckResponse),
        (status = 400, description = "Invalid deck", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such deck for this user", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "updateDeck",
    security(("SessionCookie" = []))
)]
#[patch("/decks/{id}")]
pub async fn update_deck(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<DeckPatchPayload>,
) -> ApiResult<web::Json<DeckResponse>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let DeckPatchPayload { name, description } = payload.into_inner();
    let deck = state
        .decks
        .update_deck(UpdateDeckRequest {
            owner,
            deck_id: DeckId::new(path.into_inner()),
            mode: UpdateMode::Partial,
            name,
            description,
        })
        .await?;
    Ok(web::Json(deck.into()))
}

/// Delete a deck and every card in it.
#[utoipa::path(
    delete,
    path = "/api/v1/decks/{id}",
    params(("id" = i64, Path, description = "Deck id")),
    responses(
        (status = 204, description = "Deck deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such deck for this user", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "deleteDeck",
    security(("SessionCookie" = []))
)]
#[delete("/decks/{id}")]
pub async fn delete_deck(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_account(state.login.as_ref()).await?;
    state
        .decks
        .delete_deck(&owner, DeckId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "decks_tests.rs"]
mod tests;
