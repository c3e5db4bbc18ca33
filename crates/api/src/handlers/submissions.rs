//! Handler for creating visitor submissions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use reelpick_core::submission::{fields, validate_and_shape, FieldErrors};
use reelpick_db::models::submission::Submission;
use reelpick_db::repositories::SubmissionRepo;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::admission::Admitted;
use crate::state::AppState;

/// POST /api/v1/submissions (also POST /api/submit)
///
/// Admission check, validation and shaping, then a single insert. Returns
/// the stored row with 201 Created, the field error map with 400, or 429
/// when the caller's IP is over its limit. Storage failures are not retried.
pub async fn create_submission(
    State(state): State<AppState>,
    admitted: Admitted,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Submission>)> {
    let Json(body) = body.map_err(|rejection| {
        AppError::Invalid(FieldErrors::single(fields::NON_FIELD, rejection.body_text()))
    })?;

    let input = validate_and_shape(&body).inspect_err(|errors| {
        tracing::info!(
            client_ip = %admitted.client_ip,
            errors = %errors,
            "Submission rejected"
        );
    })?;

    let stored = SubmissionRepo::create(&state.pool, &input).await?;

    tracing::info!(
        submission_id = stored.id,
        client_ip = %admitted.client_ip,
        movies = stored.selected_movies.len(),
        "Submission stored"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}
