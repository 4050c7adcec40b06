//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside handlers, namely
//! trace correlation and per-client throttling.

pub mod rate_limit;
pub mod trace;

pub use rate_limit::{RateLimit, RateLimiter};
pub use trace::Trace;
