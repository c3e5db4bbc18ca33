//! Route definitions for visitor submissions.

use axum::routing::post;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes merged into `/api/v1`.
///
/// ```text
/// POST /submissions  -> create_submission
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/submissions", post(submissions::create_submission))
}

/// Root-level paths kept for the older front-end clients.
///
/// ```text
/// POST /api/submit   -> create_submission
/// POST /api/submit/  -> create_submission
/// POST /api/submissions   -> create_submission
/// POST /api/submissions/  -> create_submission
/// ```
pub fn legacy_router() -> Router<AppState> {
    Router::new()
        .route("/api/submit", post(submissions::create_submission))
        .route("/api/submit/", post(submissions::create_submission))
        .route("/api/submissions", post(submissions::create_submission))
        .route("/api/submissions/", post(submissions::create_submission))
}
