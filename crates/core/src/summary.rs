//! Condensed one-line renderings used by the admin submission listing.

use serde_json::{Map, Value};

use crate::submission::MovieRef;

/// Movie titles joined with `", "`, in selection order.
pub fn movie_titles(movies: &[MovieRef]) -> String {
    movies
        .iter()
        .map(|m| m.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ratings rendered as `"<movie>: <rating>"` pairs joined with `", "`.
///
/// String ratings are shown without their JSON quotes.
pub fn ratings_summary(ratings: &Map<String, Value>) -> String {
    ratings
        .iter()
        .map(|(movie, rating)| match rating {
            Value::String(s) => format!("{movie}: {s}"),
            other => format!("{movie}: {other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
