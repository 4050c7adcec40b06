//! Application settings loaded via OrthoConfig.
//!
//! Values layer from `FLASHCARDS_*` environment variables, an optional
//! configuration file, and command-line flags. Every field is optional; the
//! accessors supply defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::middleware::rate_limit::{Quota, RateLimitConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_USER_RATE_LIMIT: u32 = 100;
const DEFAULT_ANONYMOUS_RATE_LIMIT: u32 = 20;
const DEFAULT_RATE_WINDOW_SECS: u64 = 60;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("rate window must be at least one second")]
    ZeroWindow,
}

/// Server settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLASHCARDS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Requests per window for logged-in users.
    pub user_rate_limit: Option<u32>,
    /// Requests per window for anonymous clients.
    pub anonymous_rate_limit: Option<u32>,
    /// Rate-limit window length in seconds.
    pub rate_window_secs: Option<u64>,
}

impl AppSettings {
    /// Resolve the listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Examples
    /// ```
    /// use flashcards::settings::AppSettings;
    ///
    /// let settings = AppSettings::default();
    /// assert_eq!(settings.bind_addr().expect("default").port(), 8080);
    /// ```
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Build the throttling quotas.
    pub fn rate_limit(&self) -> Result<RateLimitConfig, SettingsError> {
        let secs = self.rate_window_secs.unwrap_or(DEFAULT_RATE_WINDOW_SECS);
        if secs == 0 {
            return Err(SettingsError::ZeroWindow);
        }
        let window = Duration::from_secs(secs);
        Ok(RateLimitConfig {
            user: Quota::new(
                self.user_rate_limit.unwrap_or(DEFAULT_USER_RATE_LIMIT),
                window,
            ),
            anonymous: Quota::new(
                self.anonymous_rate_limit
                    .unwrap_or(DEFAULT_ANONYMOUS_RATE_LIMIT),
                window,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "FLASHCARDS_BIND_ADDR",
        "FLASHCARDS_DATABASE_URL",
        "FLASHCARDS_POOL_MAX_SIZE",
        "FLASHCARDS_USER_RATE_LIMIT",
        "FLASHCARDS_ANONYMOUS_RATE_LIMIT",
        "FLASHCARDS_RATE_WINDOW_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("flashcards")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(
            settings.rate_limit().expect("quotas"),
            RateLimitConfig::default()
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FLASHCARDS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "FLASHCARDS_DATABASE_URL",
                Some("postgres://localhost/cards".to_owned()),
            ),
            ("FLASHCARDS_POOL_MAX_SIZE", Some("4".to_owned())),
            ("FLASHCARDS_USER_RATE_LIMIT", Some("7".to_owned())),
            ("FLASHCARDS_ANONYMOUS_RATE_LIMIT", Some("2".to_owned())),
            ("FLASHCARDS_RATE_WINDOW_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let quotas = settings.rate_limit().expect("quotas");

        assert_eq!(settings.bind_addr().expect("bind addr").port(), 9000);
        assert_eq!(settings.database_url(), Some("postgres://localhost/cards"));
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(quotas.user, Quota::new(7, Duration::from_secs(5)));
        assert_eq!(quotas.anonymous, Quota::new(2, Duration::from_secs(5)));
    }

    #[rstest]
    #[case(Some("   "))]
    #[case(Some(""))]
    fn blank_database_urls_select_the_memory_store(#[case] url: Option<&str>) {
        let settings = AppSettings {
            database_url: url.map(str::to_owned),
            ..AppSettings::default()
        };
        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn malformed_bind_addresses_are_rejected() {
        let settings = AppSettings {
            bind_addr: Some("localhost".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn zero_length_windows_are_rejected() {
        let settings = AppSettings {
            rate_window_secs: Some(0),
            ..AppSettings::default()
        };
        assert!(matches!(settings.rate_limit(), Err(SettingsError::ZeroWindow)));
    }
}
