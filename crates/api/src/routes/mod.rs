pub mod admin;
pub mod health;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /submissions                   create (public, rate limited)
///
/// /admin/login                   login (public)
/// /admin/submissions             list (admin token)
/// /admin/submissions/{id}        get (admin token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(submissions::router())
        .nest("/admin", admin::router())
}
