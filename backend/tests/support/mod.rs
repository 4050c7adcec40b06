//! Shared harness for the HTTP integration suites.
//!
//! Builds the full middleware stack over an [`InMemoryStore`] and offers
//! helpers for the signup, login and JSON round trips every suite needs.

use std::sync::Arc;
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::NormalizePath;
use actix_web::{App, test as actix_test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use flashcards::Trace;
use flashcards::domain::{AccountService, DeckService, FlashcardService};
use flashcards::inbound::http::configure_api;
use flashcards::inbound::http::state::{AccountPorts, ContentPorts, HttpState};
use flashcards::middleware::rate_limit::{Quota, RateLimitConfig};
use flashcards::middleware::{RateLimit, RateLimiter};
use flashcards::outbound::memory::InMemoryStore;

/// Password accepted by the signup policy.
pub const PASSWORD: &str = "correct-horse-battery";

/// Quotas high enough that suites not about throttling never hit them.
pub fn generous_limits() -> RateLimitConfig {
    let quota = Quota::new(10_000, Duration::from_secs(60));
    RateLimitConfig {
        user: quota,
        anonymous: quota,
    }
}

fn http_state(store: &Arc<InMemoryStore>) -> HttpState {
    let clock = Arc::new(DefaultClock);
    let accounts = Arc::new(AccountService::new(store.clone(), clock.clone()));
    let decks = Arc::new(DeckService::new(store.clone(), clock.clone()));
    let cards = Arc::new(FlashcardService::new(store.clone(), store.clone(), clock));
    HttpState::new(
        AccountPorts {
            login: accounts.clone(),
            signup: accounts,
        },
        ContentPorts {
            decks: decks.clone(),
            decks_query: decks,
            flashcards: cards.clone(),
            flashcards_query: cards.clone(),
            bulk: cards,
        },
    )
}

/// The production middleware stack over `store`.
pub fn build_app(
    store: &Arc<InMemoryStore>,
    limits: RateLimitConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    let api = web::scope("/api/v1")
        .wrap(RateLimit::new(Arc::new(RateLimiter::new(limits))))
        .wrap(session)
        .configure(configure_api);

    App::new()
        .app_data(web::Data::new(http_state(store)))
        .wrap(NormalizePath::trim())
        .wrap(Trace)
        .service(api)
}

/// Send `req` and decode the body; an empty body decodes as `null`.
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(app, req).await;
    let status = res.status();
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Register `username` and return a logged-in session cookie.
pub async fn register_and_login<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let credentials = json!({"username": username, "password": PASSWORD});
    let (status, _) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup for {username}");

    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login for {username}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie issued")
}

/// Create a deck as `cookie`'s user and return its id.
pub async fn create_deck<S, B>(app: &S, cookie: &Cookie<'static>, name: &str) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/decks")
            .cookie(cookie.clone())
            .set_json(json!({"name": name}))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create deck {name}: {body}");
    body["id"].as_i64().expect("deck id")
}

/// Create a flashcard in `deck` and return its id.
pub async fn create_card<S, B>(app: &S, cookie: &Cookie<'static>, deck: i64, question: &str) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/flashcards")
            .cookie(cookie.clone())
            .set_json(json!({"question": question, "answer": "answer", "deck": deck}))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create card {question}: {body}");
    body["id"].as_i64().expect("flashcard id")
}

/// GET `uri` as `cookie`'s user.
pub async fn get<S, B>(app: &S, cookie: &Cookie<'static>, uri: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(
        app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await
}
