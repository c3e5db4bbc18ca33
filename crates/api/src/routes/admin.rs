//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /login              -> login
/// GET  /submissions        -> list_submissions
/// GET  /submissions/{id}   -> get_submission
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/submissions", get(admin::list_submissions))
        .route("/submissions/{id}", get(admin::get_submission))
}
