//! Submission entity model.

use reelpick_core::submission::MovieRef;
use reelpick_core::types::{DbId, Timestamp};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `submissions` table.
///
/// Serializes to the shape returned by the create endpoint; the JSONB
/// columns appear as plain JSON.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub email: String,
    pub phone: String,
    pub selected_movies: Json<Vec<MovieRef>>,
    pub movie_ratings: Json<Map<String, Value>>,
    pub created_at: Timestamp,
}
