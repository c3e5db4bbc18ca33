//! Liveness and readiness report for deploy probes.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database is reachable and fully migrated, else `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub admission: AdmissionHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    /// Newest applied migration, if the migrations table could be read.
    pub schema_version: Option<i64>,
    /// Whether every migration embedded in this build has been applied.
    pub schema_current: bool,
}

#[derive(Serialize)]
pub struct AdmissionHealth {
    /// Client IPs currently holding a rate-limit window.
    pub tracked_clients: usize,
    pub max_requests: u32,
    pub window_secs: u64,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = reelpick_db::health_check(&state.pool).await.is_ok();
    let schema_version = if reachable {
        reelpick_db::applied_migration(&state.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read migration status");
                None
            })
    } else {
        None
    };
    let schema_current = matches!(
        (schema_version, reelpick_db::latest_migration()),
        (Some(applied), Some(latest)) if applied >= latest
    );

    let limits = state.rate_limiter.config();

    Json(HealthResponse {
        status: if reachable && schema_current { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth {
            reachable,
            schema_version,
            schema_current,
        },
        admission: AdmissionHealth {
            tracked_clients: state.rate_limiter.tracked_clients(),
            max_requests: limits.max_requests,
            window_secs: limits.window.as_secs(),
        },
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
