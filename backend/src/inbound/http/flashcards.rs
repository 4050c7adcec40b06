//! Flashcard API handlers.
//!
//! ```text
//! GET    /api/v1/flashcards?deck=7
//! POST   /api/v1/flashcards        {"question":"Capital of France?","answer":"Paris","deck":7}
//! GET    /api/v1/flashcards/{id}
//! PUT    /api/v1/flashcards/{id}
//! PATCH  /api/v1/flashcards/{id}   {"answer":"Paris, France"}
//! DELETE /api/v1/flashcards/{id}
//! ```
//!
//! The batch endpoints live in [`super::bulk`] and must be registered ahead
//! of these so `bulk_create` is not captured as an `{id}`.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use futures_util::future::{Ready, ready};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    CreateFlashcardRequest, FlashcardInput, UpdateFlashcardRequest, UpdateMode,
};
use crate::domain::{DeckId, Flashcard, FlashcardId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Flashcard representation returned by the API.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardResponse {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = "Capital of France?")]
    pub question: String,
    #[schema(example = "Paris")]
    pub answer: String,
    #[schema(example = 7)]
    pub deck: i64,
    #[schema(value_type = String, format = Uuid)]
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<Flashcard> for FlashcardResponse {
    fn from(card: Flashcard) -> Self {
        Self {
            id: card.id().get(),
            question: card.question().as_ref().to_owned(),
            answer: card.answer().as_ref().to_owned(),
            deck: card.deck().get(),
            owner: card.owner().clone(),
            created_at: card.created_at(),
        }
    }
}

/// Flashcard fields accepted on create and update.
///
/// Server-owned fields such as `id` and `owner` are ignored when present.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardPayload {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub deck: Option<i64>,
}

impl From<FlashcardPayload> for FlashcardInput {
    fn from(payload: FlashcardPayload) -> Self {
        Self {
            question: payload.question,
            answer: payload.answer,
            deck: payload.deck.map(DeckId::new),
        }
    }
}

/// Optional deck filter for `GET /flashcards`.
///
/// Read straight from the query string: the first `deck` value wins and
/// anything that is not an integer id leaves the listing unfiltered.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeckFilter {
    /// Deck id; anything that is not an integer is ignored.
    pub deck: Option<String>,
}

impl DeckFilter {
    fn from_query(query: &str) -> Self {
        let deck = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "deck")
            .map(|(_, value)| value.into_owned());
        Self { deck }
    }

    fn deck_id(&self) -> Option<DeckId> {
        self.deck.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

impl FromRequest for DeckFilter {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_query(req.query_string())))
    }
}

/// List the caller's flashcards, optionally within one deck.
#[utoipa::path(
    get,
    path = "/api/v1/flashcards",
    params(DeckFilter),
    responses(
        (status = 200, description = "Caller's flashcards", body = [FlashcardResponse]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "listFlashcards",
    security(("SessionCookie" = []))
)]
#[get("/flashcards")]
pub async fn list_flashcards(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: DeckFilter,
) -> ApiResult<web::Json<Vec<FlashcardResponse>>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let cards = state
        .flashcards_query
        .list_flashcards(&owner, filter.deck_id())
        .await?;
    Ok(web::Json(
        cards.into_iter().map(FlashcardResponse::from).collect(),
    ))
}

/// Create a flashcard in one of the caller's decks.
#[utoipa::path(
    post,
    path = "/api/v1/flashcards",
    request_body = FlashcardPayload,
    responses(
        (status = 201, description = "Flashcard created", body = FlashcardResponse),
        (status = 400, description = "Invalid flashcard or foreign deck", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "createFlashcard",
    security(("SessionCookie" = []))
)]
#[post("/flashcards")]
pub async fn create_flashcard(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FlashcardPayload>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let card = state
        .flashcards
        .create_flashcard(CreateFlashcardRequest {
            owner,
            input: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created().json(FlashcardResponse::from(card)))
}

/// Fetch one of the caller's flashcards.
#[utoipa::path(
    get,
    path = "/api/v1/flashcards/{id}",
    params(("id" = i64, Path, description = "Flashcard id")),
    responses(
        (status = 200, description = "Flashcard", body = FlashcardResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such flashcard for this user", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "getFlashcard",
    security(("SessionCookie" = []))
)]
#[get("/flashcards/{id}")]
pub async fn get_flashcard(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<FlashcardResponse>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let card = state
        .flashcards_query
        .get_flashcard(&owner, FlashcardId::new(path.into_inner()))
        .await?;
    Ok(web::Json(card.into()))
}

async fn apply_update(
    state: &HttpState,
    session: &SessionContext,
    flashcard_id: i64,
    mode: UpdateMode,
    payload: FlashcardPayload,
) -> ApiResult<web::Json<FlashcardResponse>> {
    let owner = session.require_account(state.login.as_ref()).await?;
    let card = state
        .flashcards
        .update_flashcard(UpdateFlashcardRequest {
            owner,
            flashcard_id: FlashcardId::new(flashcard_id),
            mode,
            input: payload.into(),
        })
        .await?;
    Ok(web::Json(card.into()))
}

/// Replace a flashcard; every field is required.
#[utoipa::path(
    put,
    path = "/api/v1/flashcards/{id}",
    params(("id" = i64, Path, description = "Flashcard id")),
    request_body = FlashcardPayload,
    responses(
        (status = 200, description = "Flashcard replaced", body = FlashcardResponse),
        (status = 400, description = "Invalid flashcard or foreign deck", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such flashcard for this user", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "replaceFlashcard",
    security(("SessionCookie" = []))
)]
#[put("/flashcards/{id}")]
pub async fn replace_flashcard(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<FlashcardPayload>,
) -> ApiResult<web::Json<FlashcardResponse>> {
    apply_update(
        &state,
        &session,
        path.into_inner(),
        UpdateMode::Replace,
        payload.into_inner(),
    )
    .await
}

/// Change a subset of a flashcard's fields, including moving it to another
/// of the caller's decks.
#[utoipa::path(
    patch,
    path = "/api/v1/flashcards/{id}",
    params(("id" = i64, Path, description = "Flashcard id")),
    request_body = FlashcardPayload,
    responses(
        (status = 200, description = "Flashcard updated", body = FlashcardResponse),
        (status = 400, description = "Invalid flashcard or foreign deck", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such flashcard for this user", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "updateFlashcard",
    security(("SessionCookie" = []))
)]
#[patch("/flashcards/{id}")]
pub async fn update_flashcard(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<FlashcardPayload>,
) -> ApiResult<web::Json<FlashcardResponse>> {
    apply_update(
        &state,
        &session,
        path.into_inner(),
        UpdateMode::Partial,
        payload.into_inner(),
    )
    .await
}

/// Delete one of the caller's flashcards.
#[utoipa::path(
    delete,
    path = "/api/v1/flashcards/{id}",
    params(("id" = i64, Path, description = "Flashcard id")),
    responses(
        (status = 204, description = "Flashcard deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such flashcard for this user", body = ErrorSchema)
    ),
    tags = ["flashcards"],
    operation_id = "deleteFlashcard",
    security(("SessionCookie" = []))
)]
#[delete("/flashcards/{id}")]
pub async fn delete_flashcard(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_account(state.login.as_ref()).await?;
    state
        .flashcards
        .delete_flashcard(&owner, FlashcardId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "flashcards_tests.rs"]
mod tests;
