//! Admin account model and DTOs.

use reelpick_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `admin_users` table.
///
/// Contains the password hash and is therefore never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the superuser upsert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UpsertSuperuser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
