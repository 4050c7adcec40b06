//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use flashcards::middleware::rate_limit::RateLimitConfig;
use flashcards::outbound::memory::InMemoryStore;
use flashcards::outbound::persistence::DbPool;

/// Where repositories keep their data.
#[derive(Clone)]
pub enum StoreBackend {
    Postgres(DbPool),
    Memory(Arc<InMemoryStore>),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreBackend,
    pub(crate) rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Construct a server configuration backed by a fresh in-memory store.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            store: StoreBackend::Memory(Arc::new(InMemoryStore::new())),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Use PostgreSQL repositories over `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.store = StoreBackend::Postgres(pool);
        self
    }

    /// Override the default throttling quotas.
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}
