//! JWT-based admin authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reelpick_core::error::CoreError;
use reelpick_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Admin extracted from a JWT Bearer token in the `Authorization` header.
///
/// Tokens are only issued to staff accounts, so holding a valid one is
/// enough to read the admin view.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: DbId,
    pub username: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AdminSession {
            admin_id: claims.sub,
            username: claims.username,
        })
    }
}
