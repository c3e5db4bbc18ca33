//! Repository for the `submissions` table.

use reelpick_core::submission::NewSubmission;
use reelpick_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::submission::Submission;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, phone, selected_movies, movie_ratings, created_at";

/// Insert and read operations for submissions. There is no update or delete.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a validated submission, returning the stored row.
    pub async fn create(pool: &PgPool, input: &NewSubmission) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions (email, phone, selected_movies, movie_ratings)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(Json(&input.selected_movies))
            .bind(Json(&input.movie_ratings))
            .fetch_one(pool)
            .await
    }

    /// Find a submission by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all submissions, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Submission>(&query).fetch_all(pool).await
    }

    /// Total number of stored submissions.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM submissions")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
