//! Configuration management for the booking client.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::wizard::ConsentPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default backend location
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default `tracing` filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,booking=debug";

const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Booking client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (`BOOKING_API_BASE_URL`)
    pub api_base_url: String,
    /// Experience to book (`BOOKING_EXPERIENCE_ID`)
    pub experience_id: Option<String>,
    /// Gate submission on the terms checkbox (`BOOKING_REQUIRE_TERMS`)
    pub require_terms: bool,
    /// Seconds to wait for in-flight effects on shutdown (`BOOKING_SHUTDOWN_TIMEOUT_SECS`)
    pub shutdown_timeout_secs: u64,
    /// `tracing` filter directives (`RUST_LOG`)
    pub log_filter: String,
}

/// Invalid configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL is not an http(s) URL
    #[error("BOOKING_API_BASE_URL must start with http:// or https://, got `{0}`")]
    InvalidBaseUrl(String),

    /// A zero shutdown timeout would drop every in-flight booking
    #[error("BOOKING_SHUTDOWN_TIMEOUT_SECS must be greater than zero")]
    ZeroShutdownTimeout,
}

impl Config {
    /// Load configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            api_base_url: non_empty("BOOKING_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            experience_id: non_empty("BOOKING_EXPERIENCE_ID"),
            require_terms: non_empty("BOOKING_REQUIRE_TERMS")
                .is_some_and(|value| parse_flag(&value)),
            shutdown_timeout_secs: non_empty("BOOKING_SHUTDOWN_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            log_filter: non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Check values that have no sensible fallback
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.api_base_url.clone()));
        }
        if self.shutdown_timeout_secs == 0 {
            return Err(ConfigError::ZeroShutdownTimeout);
        }
        Ok(())
    }

    /// Consent policy for new wizards
    #[must_use]
    pub const fn consent_policy(&self) -> ConsentPolicy {
        ConsentPolicy {
            require_terms_acceptance: self.require_terms,
        }
    }

    /// Shutdown grace period
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
