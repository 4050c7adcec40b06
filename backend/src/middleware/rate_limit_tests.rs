//! Regression coverage for this module.

use std::net::SocketAddr;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test, web};
use rstest::{fixture, rstest};

use super::*;
use crate::inbound::http::test_utils::test_session_middleware;

const MINUTE: Duration = Duration::from_secs(60);

#[fixture]
fn limiter() -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
        user: Quota::new(3, MINUTE),
        anonymous: Quota::new(2, MINUTE),
    })
}

fn anon(addr: &str) -> ClientKey {
    ClientKey::Anonymous(addr.to_owned())
}

#[rstest]
fn counts_down_then_limits(limiter: RateLimiter) {
    let now = Instant::now();
    let key = anon("10.0.0.1");

    assert_eq!(
        limiter.check_at(&key, now),
        Decision::Allowed { remaining: 1 }
    );
    assert_eq!(
        limiter.check_at(&key, now),
        Decision::Allowed { remaining: 0 }
    );
    assert_eq!(
        limiter.check_at(&key, now + Duration::from_secs(15)),
        Decision::Limited {
            retry_after: Duration::from_secs(45)
        }
    );
}

#[rstest]
fn window_resets_after_expiry(limiter: RateLimiter) {
    let start = Instant::now();
    let key = anon("10.0.0.1");
    limiter.check_at(&key, start);
    limiter.check_at(&key, start);

    assert!(matches!(
        limiter.check_at(&key, start + MINUTE),
        Decision::Allowed { remaining: 1 }
    ));
}

#[rstest]
fn identities_are_counted_separately(limiter: RateLimiter) {
    let now = Instant::now();
    limiter.check_at(&anon("10.0.0.1"), now);
    limiter.check_at(&anon("10.0.0.1"), now);

    assert!(matches!(
        limiter.check_at(&anon("10.0.0.2"), now),
        Decision::Allowed { .. }
    ));
    assert_eq!(
        limiter.check_at(&ClientKey::User("ada".to_owned()), now),
        Decision::Allowed { remaining: 2 }
    );
}

fn capped(max_tracked: usize, sweep_interval: u64) -> RateLimiter {
    RateLimiter::with_tracking(
        RateLimitConfig {
            user: Quota::new(3, MINUTE),
            anonymous: Quota::new(2, MINUTE),
        },
        TrackingLimits {
            max_tracked,
            sweep_interval,
        },
    )
}

#[rstest]
fn full_table_refuses_new_identities_but_serves_known_ones() {
    let limiter = capped(2, 1_000);
    let now = Instant::now();
    limiter.check_at(&anon("10.0.0.1"), now);
    limiter.check_at(&anon("10.0.0.2"), now);

    let newcomer = limiter.check_at(&anon("10.0.0.3"), now);
    let known = limiter.check_at(&anon("10.0.0.1"), now);

    assert_eq!(newcomer, Decision::Limited { retry_after: MINUTE });
    assert_eq!(known, Decision::Allowed { remaining: 0 });
    assert_eq!(limiter.tracked(), 2);
}

#[rstest]
fn full_table_makes_room_once_windows_expire() {
    let limiter = capped(2, 1_000);
    let start = Instant::now();
    limiter.check_at(&anon("10.0.0.1"), start);
    limiter.check_at(&anon("10.0.0.2"), start);

    let later = limiter.check_at(&anon("10.0.0.3"), start + MINUTE);

    assert_eq!(later, Decision::Allowed { remaining: 1 });
    assert_eq!(limiter.tracked(), 1);
}

#[rstest]
fn periodic_sweeps_drop_expired_windows() {
    let limiter = capped(100, 3);
    let start = Instant::now();
    limiter.check_at(&anon("10.0.0.1"), start);
    limiter.check_at(&anon("10.0.0.2"), start);
    assert_eq!(limiter.tracked(), 2);

    limiter.check_at(&ClientKey::User("ada".to_owned()), start + MINUTE);

    assert_eq!(limiter.tracked(), 1);
}

#[rstest]
#[case(Duration::from_millis(1), 1)]
#[case(Duration::from_secs(5), 5)]
#[case(Duration::from_millis(5_200), 6)]
#[case(Duration::ZERO, 1)]
fn retry_after_rounds_up(#[case] wait: Duration, #[case] expected: u64) {
    assert_eq!(retry_after_secs(wait), expected);
}

#[rstest]
fn client_keys_render_with_prefix() {
    assert_eq!(anon("1.2.3.4").to_string(), "anon:1.2.3.4");
    assert_eq!(ClientKey::User("u1".to_owned()).to_string(), "user:u1");
}

#[actix_web::test]
async fn middleware_rejects_excess_requests_with_retry_after() {
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        user: Quota::new(5, MINUTE),
        anonymous: Quota::new(1, MINUTE),
    }));
    let app = actix_test::init_service(
        App::new()
            .wrap(RateLimit::new(limiter))
            .wrap(test_session_middleware())
            .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;
    let peer: SocketAddr = "192.0.2.7:4000".parse().expect("socket address");

    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/").peer_addr(peer).to_request(),
    )
    .await;
    let second = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/").peer_addr(peer).to_request(),
    )
    .await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after = second
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .expect("retry-after seconds");
    assert!((1..=60).contains(&retry_after));
    let body: serde_json::Value = actix_test::read_body_json(second).await;
    assert_eq!(body["code"], "too_many_requests");
}
