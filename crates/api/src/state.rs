use std::sync::Arc;

use reelpick_core::rate_limit::RateLimiter;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reelpick_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-IP admission counters for the submission endpoint.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Build state with a fresh rate limiter sized from `config`.
    pub fn new(pool: reelpick_db::DbPool, config: ServerConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit);
        Self {
            pool,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}
