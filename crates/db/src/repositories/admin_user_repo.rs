//! Repository for the `admin_users` table.

use sqlx::{FromRow, PgPool};

use crate::models::admin_user::{AdminUser, UpsertSuperuser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, is_staff, is_superuser, \
                       created_at, updated_at";

/// Row returned by the upsert: the account plus whether it was newly inserted.
#[derive(FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    user: AdminUser,
    inserted: bool,
}

/// Provides lookup and provisioning for admin accounts.
pub struct AdminUserRepo;

impl AdminUserRepo {
    /// Create the superuser or, when the username exists, replace its password
    /// hash and set both privilege flags.
    ///
    /// The email is only written on insert. Returns the row and `true` when a
    /// new account was created.
    pub async fn upsert_superuser(
        pool: &PgPool,
        input: &UpsertSuperuser,
    ) -> Result<(AdminUser, bool), sqlx::Error> {
        // `xmax = 0` only holds for a freshly inserted tuple.
        let query = format!(
            "INSERT INTO admin_users (username, email, password_hash, is_staff, is_superuser)
             VALUES ($1, $2, $3, true, true)
             ON CONFLICT (username) DO UPDATE SET
                password_hash = EXCLUDED.password_hash,
                is_staff = true,
                is_superuser = true,
                updated_at = NOW()
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await?;

        tracing::debug!(
            admin_id = row.user.id,
            inserted = row.inserted,
            "Superuser upserted"
        );
        Ok((row.user, row.inserted))
    }

    /// Find an account by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE username = $1");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Total number of admin accounts.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
