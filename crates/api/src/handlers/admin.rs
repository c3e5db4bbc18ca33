//! Handlers for the `/admin` resource: login and the read-only submission view.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use reelpick_core::error::CoreError;
use reelpick_core::summary::{movie_titles, ratings_summary};
use reelpick_core::types::{DbId, Timestamp};
use reelpick_db::models::submission::Submission;
use reelpick_db::repositories::{AdminUserRepo, SubmissionRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// One row of the admin submission listing.
#[derive(Debug, Serialize)]
pub struct SubmissionListItem {
    pub id: DbId,
    pub email: String,
    pub phone: String,
    pub created_at: Timestamp,
    /// Selected movie titles, comma separated.
    pub movies: String,
    /// `movie: rating` pairs, comma separated.
    pub ratings: String,
}

impl From<&Submission> for SubmissionListItem {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id,
            email: s.email.clone(),
            phone: s.phone.clone(),
            created_at: s.created_at,
            movies: movie_titles(&s.selected_movies),
            ratings: ratings_summary(&s.movie_ratings),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/login
///
/// Exchange admin credentials for an access token. Only staff accounts may
/// log in.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(input) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let admin = AdminUserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(username = %input.username, "Admin login failed");
        return Err(invalid());
    }

    if !admin.is_staff {
        return Err(AppError::Core(CoreError::Forbidden(
            "Staff access required".into(),
        )));
    }

    let access_token = generate_access_token(admin.id, &admin.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(admin_id = admin.id, "Admin logged in");

    Ok(Json(LoginResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
    }))
}

/// GET /api/v1/admin/submissions
///
/// All submissions, newest first, with condensed movie and rating columns.
pub async fn list_submissions(
    State(state): State<AppState>,
    session: AdminSession,
) -> AppResult<Json<DataResponse<Vec<SubmissionListItem>>>> {
    let submissions = SubmissionRepo::list(&state.pool).await?;
    tracing::info!(
        admin_id = session.admin_id,
        admin = %session.username,
        count = submissions.len(),
        "Admin listed submissions"
    );

    let data = submissions.iter().map(SubmissionListItem::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/submissions/{id}
pub async fn get_submission(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Submission>>> {
    let submission = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id,
        }))?;

    tracing::info!(
        admin_id = session.admin_id,
        admin = %session.username,
        submission_id = id,
        "Admin viewed submission"
    );

    Ok(Json(DataResponse { data: submission }))
}
