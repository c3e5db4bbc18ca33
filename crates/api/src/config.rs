use std::num::{NonZeroU32, NonZeroU64};
use std::time::Duration;

use reelpick_core::rate_limit::{RateLimitConfig, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Per-IP admission limit for the submission endpoint.
    pub rate_limit: RateLimitConfig,
    /// Take the client IP from `X-Forwarded-For` instead of the socket peer.
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    /// JWT token configuration for the admin view.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `RATE_LIMIT_REQUESTS`    | `5`                        |
    /// | `RATE_LIMIT_WINDOW_SECS` | `60`                       |
    /// | `TRUST_FORWARDED_FOR`    | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let rate_limit = rate_limit_from_vars(
            std::env::var("RATE_LIMIT_REQUESTS").ok(),
            std::env::var("RATE_LIMIT_WINDOW_SECS").ok(),
        );

        let trust_forwarded_for = std::env::var("TRUST_FORWARDED_FOR")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            rate_limit,
            trust_forwarded_for,
            jwt,
        }
    }
}

/// Build the admission limits from the raw `RATE_LIMIT_*` values.
///
/// # Panics
///
/// Panics if either value is not a positive integer. A zero limit would block
/// every submission and a zero window would disable the limit altogether.
fn rate_limit_from_vars(requests: Option<String>, window_secs: Option<String>) -> RateLimitConfig {
    let max_requests: NonZeroU32 = requests
        .unwrap_or_else(|| DEFAULT_MAX_REQUESTS.to_string())
        .parse()
        .expect("RATE_LIMIT_REQUESTS must be a positive u32");

    let window_secs: NonZeroU64 = window_secs
        .unwrap_or_else(|| DEFAULT_WINDOW_SECS.to_string())
        .parse()
        .expect("RATE_LIMIT_WINDOW_SECS must be a positive u64");

    RateLimitConfig {
        max_requests: max_requests.get(),
        window: Duration::from_secs(window_secs.get()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_defaults_to_five_per_minute() {
        assert_eq!(rate_limit_from_vars(None, None), RateLimitConfig::default());
    }

    #[test]
    fn rate_limit_overrides_are_applied() {
        let config = rate_limit_from_vars(Some("10".into()), Some("30".into()));
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window, Duration::from_secs(30));
    }

    #[test]
    #[should_panic(expected = "RATE_LIMIT_REQUESTS must be a positive u32")]
    fn zero_request_limit_is_rejected() {
        rate_limit_from_vars(Some("0".into()), None);
    }

    #[test]
    #[should_panic(expected = "RATE_LIMIT_WINDOW_SECS must be a positive u64")]
    fn zero_window_is_rejected() {
        rate_limit_from_vars(None, Some("0".into()));
    }

    #[test]
    #[should_panic(expected = "RATE_LIMIT_REQUESTS must be a positive u32")]
    fn non_numeric_request_limit_is_rejected() {
        rate_limit_from_vars(Some("five".into()), None);
    }
}
