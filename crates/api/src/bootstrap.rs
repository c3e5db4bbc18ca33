//! Superuser provisioning, run out of band by the `reelpick-bootstrap` binary.
//!
//! One policy: idempotent upsert keyed by username. Running it on every
//! deploy is safe and rotates the password whenever the configured value
//! changes.

use reelpick_core::superuser::{SuperuserConfig, SuperuserOutcome};
use reelpick_db::models::admin_user::UpsertSuperuser;
use reelpick_db::repositories::AdminUserRepo;
use reelpick_db::DbPool;

use crate::auth::password::hash_password;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Create the configured superuser, or reset its password and privilege
/// flags when it already exists.
pub async fn ensure_superuser(
    pool: &DbPool,
    config: &SuperuserConfig,
) -> Result<SuperuserOutcome, BootstrapError> {
    let password_hash =
        hash_password(&config.password).map_err(|e| BootstrapError::Hashing(e.to_string()))?;

    let input = UpsertSuperuser {
        username: config.username.clone(),
        email: config.email.clone(),
        password_hash,
    };
    let (admin, created) = AdminUserRepo::upsert_superuser(pool, &input).await?;

    let outcome = if created {
        SuperuserOutcome::Created
    } else {
        SuperuserOutcome::PasswordUpdated
    };
    tracing::info!(admin_id = admin.id, username = %admin.username, ?outcome, "Superuser ensured");

    Ok(outcome)
}
