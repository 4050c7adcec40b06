//! Fixed-window request throttling.
//!
//! Requests are counted per client identity: the session user id when the
//! caller is logged in, otherwise the peer IP address. Logged-in users and
//! anonymous clients have separate quotas. Once a window's quota is spent,
//! further requests get `429 Too Many Requests` with a `Retry-After` header
//! until the window resets.
//!
//! The session middleware must wrap this one (be registered after it) so the
//! session is readable when the identity is resolved.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::Error as DomainError;
use crate::inbound::http::session::SessionContext;


/// Requests allowed per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub limit: u32,
    pub window: Duration,
}

impl Quota {
    pub const fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }
}

/// Quotas for authenticated and anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub user: Quota,
    pub anonymous: Quota,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            user: Quota::new(100, Duration::from_secs(60)),
            anonymous: Quota::new(20, Duration::from_secs(60)),
        }
    }
}

/// Identity a request is counted against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientKey {
    User(String),
    Anonymous(String),
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Anonymous(addr) => write!(f, "anon:{addr}"),
        }
    }
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Bounds on the counter table.
///
/// Expired windows are swept every `sweep_interval` requests. The table never
/// holds more than `max_tracked` identities; once it is full and a sweep frees
/// nothing, new identities are limited until old windows expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingLimits {
    pub max_tracked: usize,
    pub sweep_interval: u64,
}

impl Default for TrackingLimits {
    fn default() -> Self {
        Self {
            max_tracked: 10_000,
            sweep_interval: 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Default)]
struct Table {
    windows: HashMap<ClientKey, Window>,
    requests: u64,
}

/// Shared counter table.
///
/// # Examples
/// ```
/// use std::time::{Duration, Instant};
///
/// use flashcards::middleware::rate_limit::{
///     ClientKey, Decision, Quota, RateLimitConfig, RateLimiter,
/// };
///
/// let limiter = RateLimiter::new(RateLimitConfig {
///     user: Quota::new(1, Duration::from_secs(60)),
///     anonymous: Quota::new(1, Duration::from_secs(60)),
/// });
/// let key = ClientKey::Anonymous("127.0.0.1".into());
/// let now = Instant::now();
/// assert!(matches!(limiter.check_at(&key, now), Decision::Allowed { .. }));
/// assert!(matches!(limiter.check_at(&key, now), Decision::Limited { .. }));
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    tracking: TrackingLimits,
    table: Mutex<Table>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_tracking(config, TrackingLimits::default())
    }

    pub fn with_tracking(config: RateLimitConfig, tracking: TrackingLimits) -> Self {
        Self {
            config,
            tracking,
            table: Mutex::new(Table::default()),
        }
    }

    fn quota_for(&self, key: &ClientKey) -> Quota {
        match key {
            ClientKey::User(_) => self.config.user,
            ClientKey::Anonymous(_) => self.config.anonymous,
        }
    }

    fn sweep(&self, windows: &mut HashMap<ClientKey, Window>, now: Instant) {
        windows.retain(|key, window| {
            now.saturating_duration_since(window.started) < self.quota_for(key).window
        });
    }

    /// Number of identities currently tracked.
    pub fn tracked(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .windows
            .len()
    }

    /// Count a request from `key` at `now`.
    pub fn check_at(&self, key: &ClientKey, now: Instant) -> Decision {
        let quota = self.quota_for(key);
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let Table { windows, requests } = &mut *table;

        *requests += 1;
        if *requests % self.tracking.sweep_interval.max(1) == 0 {
            self.sweep(windows, now);
        }
        if !windows.contains_key(key) && windows.len() >= self.tracking.max_tracked {
            self.sweep(windows, now);
            if windows.len() >= self.tracking.max_tracked {
                warn!(
                    client = %key,
                    tracked = windows.len(),
                    "rate limiter table full; refusing new client"
                );
                return Decision::Limited {
                    retry_after: quota.window,
                };
            }
        }

        let window = windows.entry(key.clone()).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= quota.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= quota.limit {
            let retry_after = quota
                .window
                .saturating_sub(now.saturating_duration_since(window.started));
            return Decision::Limited { retry_after };
        }
        window.count += 1;
        Decision::Allowed {
            remaining: quota.limit - window.count,
        }
    }

    /// Count a request from `key` now.
    pub fn check(&self, key: &ClientKey) -> Decision {
        self.check_at(key, Instant::now())
    }
}

fn client_key(req: &ServiceRequest) -> ClientKey {
    let session = SessionContext::new(req.get_session());
    match session.user_id() {
        Ok(Some(user_id)) => ClientKey::User(user_id.to_string()),
        _ => ClientKey::Anonymous(
            req.peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_owned()),
        ),
    }
}

/// Whole seconds to advertise in `Retry-After`, never zero.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

/// Middleware factory applying a [`RateLimiter`].
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = client_key(&req);
        match self.limiter.check(&key) {
            Decision::Allowed { .. } => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Decision::Limited { retry_after } => {
                let secs = retry_after_secs(retry_after);
                warn!(client = %key, retry_after = secs, "request throttled");
                // Built inside the future so the trace scope is active.
                Box::pin(async move {
                    let mut response = DomainError::too_many_requests(format!(
                        "request was throttled; expected available in {secs} seconds"
                    ))
                    .error_response();
                    response
                        .headers_mut()
                        .insert(RETRY_AFTER, HeaderValue::from(secs));
                    Ok(req.into_response(response).map_into_right_body())
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
