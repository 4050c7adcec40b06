//! End-to-end checks for throttling and the request envelope.

#[expect(dead_code, reason = "this suite only drives a subset of the shared HTTP helpers")]
mod support;

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::RETRY_AFTER;
use actix_web::test as actix_test;
use rstest::rstest;

use flashcards::domain::TRACE_ID_HEADER;
use flashcards::middleware::rate_limit::{Quota, RateLimitConfig};
use flashcards::outbound::memory::InMemoryStore;
use support::{build_app, generous_limits, get, register_and_login};

const WINDOW: Duration = Duration::from_secs(1);

#[rstest]
#[actix_web::test]
async fn anonymous_callers_are_throttled_until_the_window_resets() {
    let store = Arc::new(InMemoryStore::new());
    let limits = RateLimitConfig {
        user: Quota::new(100, WINDOW),
        anonymous: Quota::new(2, WINDOW),
    };
    let app = actix_test::init_service(build_app(&store, limits)).await;
    let request = || actix_test::TestRequest::get().uri("/api/v1/decks").to_request();

    for _ in 0..2 {
        let res = actix_test::call_service(&app, request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
    let limited = actix_test::call_service(&app, request()).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers().contains_key(RETRY_AFTER));
    assert!(limited.headers().contains_key(TRACE_ID_HEADER));
    let body: serde_json::Value = actix_test::read_body_json(limited).await;
    assert_eq!(body["code"], "too_many_requests");

    actix_rt::time::sleep(WINDOW + Duration::from_millis(100)).await;

    let res = actix_test::call_service(&app, request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logged_in_users_have_their_own_quota() {
    let store = Arc::new(InMemoryStore::new());
    let limits = RateLimitConfig {
        user: Quota::new(3, Duration::from_secs(60)),
        anonymous: Quota::new(2, Duration::from_secs(60)),
    };
    let app = actix_test::init_service(build_app(&store, limits)).await;
    // Signup and login spend the anonymous quota.
    let ada = register_and_login(&app, "ada").await;

    for _ in 0..3 {
        let (status, _) = get(&app, &ada, "/api/v1/decks").await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = get(&app, &ada, "/api/v1/decks").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "too_many_requests");
}

#[rstest]
#[actix_web::test]
async fn responses_carry_a_trace_id_and_tolerate_trailing_slashes() {
    let store = Arc::new(InMemoryStore::new());
    let app = actix_test::init_service(build_app(&store, generous_limits())).await;
    let ada = register_and_login(&app, "ada").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/decks/")
            .cookie(ada)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));

    let anonymous = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/decks").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    let trace = anonymous
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body: serde_json::Value = actix_test::read_body_json(anonymous).await;
    assert!(trace.is_some());
    assert_eq!(body["traceId"].as_str(), trace.as_deref());
}
