//! Validation and shaping of incoming movie-preference submissions.
//!
//! [`validate_and_shape`] takes the raw JSON body of a submission and either
//! produces a [`NewSubmission`] ready for insertion or a [`FieldErrors`] map
//! describing every problem found. Movie entries are narrowed to `id` and
//! `title`; any other keys the client sends along (posters, genres, AI
//! reasons) are dropped without complaint.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum stored length of an email address (RFC 5321 path limit).
pub const EMAIL_MAX_LENGTH: u64 = 254;

/// Maximum stored length of a phone number, in characters.
pub const PHONE_MAX_LENGTH: u64 = 50;

/// Field names as they appear in request bodies and error maps.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const SELECTED_MOVIES: &str = "selected_movies";
    pub const MOVIE_RATINGS: &str = "movie_ratings";
    /// Key for errors that are not tied to a single field.
    pub const NON_FIELD: &str = "non_field_errors";
}

const MSG_REQUIRED: &str = "This field is required.";
const MSG_NULL: &str = "This field may not be null.";
const MSG_BLANK: &str = "This field may not be blank.";
const MSG_NOT_STRING: &str = "Not a valid string.";
const MSG_NUL: &str = "Null characters are not allowed.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Identifier of a movie as sent by the client: either a row number or an
/// opaque string key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Int(i64),
    Text(String),
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieId::Int(n) => write!(f, "{n}"),
            MovieId::Text(s) => f.write_str(s),
        }
    }
}

/// A selected movie, narrowed to the two fields that are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRef {
    pub id: MovieId,
    pub title: String,
}

/// A fully validated submission, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub email: String,
    pub phone: String,
    pub selected_movies: Vec<MovieRef>,
    /// Movie identifier to rating. Values are stored as sent.
    pub movie_ratings: Map<String, Value>,
}

/// Field-level validation errors, serialized as `{ "<field>": ["<msg>", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error set holding a single message for one field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Append a message to the given field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of all fields with at least one error.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Contact details checked with `validator` once they are known to be
/// non-blank strings.
#[derive(Debug, Validate)]
struct ContactFields {
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    email: String,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    phone: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw submission body and narrow it to its storable shape.
///
/// All fields are checked before returning, so the error map lists every
/// problem rather than only the first one.
pub fn validate_and_shape(input: &Value) -> Result<NewSubmission, FieldErrors> {
    let Some(object) = input.as_object() else {
        return Err(FieldErrors::single(
            fields::NON_FIELD,
            format!(
                "Invalid data. Expected an object, but got {}.",
                json_type_name(input)
            ),
        ));
    };

    let mut errors = FieldErrors::new();

    let email = required_string(object, fields::EMAIL, &mut errors);
    let phone = required_string(object, fields::PHONE, &mut errors);
    check_contact(email, phone, &mut errors);

    let selected_movies = shape_movies(object, &mut errors);
    let movie_ratings = ratings(object, &mut errors);

    match (email, phone, selected_movies, movie_ratings) {
        (Some(email), Some(phone), Some(selected_movies), Some(movie_ratings))
            if errors.is_empty() =>
        {
            Ok(NewSubmission {
                email: email.trim().to_string(),
                phone: phone.trim().to_string(),
                selected_movies,
                movie_ratings,
            })
        }
        _ => Err(errors),
    }
}

/// Look up a required, non-blank string field.
fn required_string<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match object.get(field) {
        None => errors.add(field, MSG_REQUIRED),
        Some(Value::Null) => errors.add(field, MSG_NULL),
        Some(Value::String(s)) if s.trim().is_empty() => errors.add(field, MSG_BLANK),
        Some(Value::String(s)) if s.contains('\0') => errors.add(field, MSG_NUL),
        Some(Value::String(s)) => return Some(s.as_str()),
        Some(_) => errors.add(field, MSG_NOT_STRING),
    }
    None
}

/// Run the `validator` rules on whichever contact fields are present.
fn check_contact(email: Option<&str>, phone: Option<&str>, errors: &mut FieldErrors) {
    if email.is_none() && phone.is_none() {
        return;
    }

    // A placeholder stands in for a field that already failed so that its
    // rules do not report twice.
    let contact = ContactFields {
        email: email.map_or("placeholder@example.com", str::trim).to_string(),
        phone: phone.map_or("", str::trim).to_string(),
    };

    if let Err(report) = contact.validate() {
        for (field, field_errors) in report.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                errors.add(&field, message);
            }
        }
    }
}

/// Validate `selected_movies` and keep only `id` and `title` of each entry.
fn shape_movies(object: &Map<String, Value>, errors: &mut FieldErrors) -> Option<Vec<MovieRef>> {
    let field = fields::SELECTED_MOVIES;
    let items = match object.get(field) {
        None => {
            errors.add(field, MSG_REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, MSG_NULL);
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            errors.add(
                field,
                format!(
                    "Expected a list of items but got type \"{}\".",
                    json_type_name(other)
                ),
            );
            return None;
        }
    };

    let mut shaped = Vec::with_capacity(items.len());
    let mut ok = true;
    for (index, item) in items.iter().enumerate() {
        match shape_movie(item) {
            Ok(movie) => shaped.push(movie),
            Err(problems) => {
                ok = false;
                for problem in problems {
                    errors.add(field, format!("Item {index}: {problem}"));
                }
            }
        }
    }

    ok.then_some(shaped)
}

fn shape_movie(item: &Value) -> Result<MovieRef, Vec<&'static str>> {
    let Some(entry) = item.as_object() else {
        return Err(vec!["expected an object with \"id\" and \"title\"."]);
    };

    let mut problems = Vec::new();

    let id = match entry.get("id") {
        None | Some(Value::Null) => {
            problems.push("\"id\" is required.");
            None
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(n) => Some(MovieId::Int(n)),
            None => {
                problems.push("\"id\" must be a string or integer.");
                None
            }
        },
        Some(Value::String(s)) if s.contains('\0') => {
            problems.push("\"id\" may not contain null characters.");
            None
        }
        Some(Value::String(s)) => Some(MovieId::Text(s.clone())),
        Some(_) => {
            problems.push("\"id\" must be a string or integer.");
            None
        }
    };

    let title = match entry.get("title") {
        None | Some(Value::Null) => {
            problems.push("\"title\" is required.");
            None
        }
        Some(Value::String(s)) if s.contains('\0') => {
            problems.push("\"title\" may not contain null characters.");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            problems.push("\"title\" must be a string.");
            None
        }
    };

    match (id, title) {
        (Some(id), Some(title)) => Ok(MovieRef { id, title }),
        _ => Err(problems),
    }
}

fn ratings(object: &Map<String, Value>, errors: &mut FieldErrors) -> Option<Map<String, Value>> {
    let field = fields::MOVIE_RATINGS;
    match object.get(field) {
        None => errors.add(field, MSG_REQUIRED),
        Some(Value::Null) => errors.add(field, MSG_NULL),
        Some(Value::Object(map)) if map_contains_nul(map) => errors.add(field, MSG_NUL),
        Some(Value::Object(map)) => return Some(map.clone()),
        Some(other) => errors.add(
            field,
            format!(
                "Expected a dictionary of items but got type \"{}\".",
                json_type_name(other)
            ),
        ),
    }
    None
}

/// Whether any string or object key nested in `value` holds U+0000, which
/// PostgreSQL refuses in both text and JSONB columns.
fn contains_nul(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains('\0'),
        Value::Array(items) => items.iter().any(contains_nul),
        Value::Object(map) => map_contains_nul(map),
        _ => false,
    }
}

fn map_contains_nul(map: &Map<String, Value>) -> bool {
    map.iter()
        .any(|(key, value)| key.contains('\0') || contains_nul(value))
}

/// JSON type name used in error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "email": "a@b.com",
            "phone": "123",
            "selected_movies": [{"id": 1, "title": "Inception", "extra": "x"}],
            "movie_ratings": {"1": 5}
        })
    }

    // -- Shaping -------------------------------------------------------------

    #[test]
    fn strips_movie_fields_other_than_id_and_title() {
        let input = json!({
            "email": "a@b.com",
            "phone": "123",
            "selected_movies": [
                {"id": 1, "title": "X", "poster": "y.jpg"},
                {"id": "row-7", "title": "Y", "genre": "Drama", "reason": "because"}
            ],
            "movie_ratings": {}
        });

        let shaped = validate_and_shape(&input).expect("valid input");
        assert_eq!(
            shaped.selected_movies,
            vec![
                MovieRef { id: MovieId::Int(1), title: "X".into() },
                MovieRef { id: MovieId::Text("row-7".into()), title: "Y".into() },
            ]
        );

        let stored = serde_json::to_value(&shaped.selected_movies).unwrap();
        assert_eq!(
            stored,
            json!([{"id": 1, "title": "X"}, {"id": "row-7", "title": "Y"}])
        );
    }

    #[test]
    fn scenario_body_is_accepted() {
        let shaped = validate_and_shape(&valid_body()).expect("valid input");
        assert_eq!(shaped.email, "a@b.com");
        assert_eq!(shaped.phone, "123");
        assert_eq!(
            serde_json::to_value(&shaped.selected_movies).unwrap(),
            json!([{"id": 1, "title": "Inception"}])
        );
        assert_eq!(shaped.movie_ratings.get("1"), Some(&json!(5)));
    }

    #[test]
    fn empty_movie_list_is_allowed() {
        let mut body = valid_body();
        body["selected_movies"] = json!([]);
        let shaped = validate_and_shape(&body).expect("valid input");
        assert!(shaped.selected_movies.is_empty());
    }

    #[test]
    fn rating_values_are_kept_as_sent() {
        let mut body = valid_body();
        body["movie_ratings"] = json!({"42": 5, "7": "3", "9": {"stars": 4}});
        let shaped = validate_and_shape(&body).expect("valid input");
        assert_eq!(shaped.movie_ratings.len(), 3);
        assert_eq!(shaped.movie_ratings["7"], json!("3"));
        assert_eq!(shaped.movie_ratings["9"], json!({"stars": 4}));
    }

    // -- Required fields -----------------------------------------------------

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = validate_and_shape(&json!({})).unwrap_err();
        for field in [
            fields::EMAIL,
            fields::PHONE,
            fields::SELECTED_MOVIES,
            fields::MOVIE_RATINGS,
        ] {
            assert_eq!(errors.get(field), Some(&[MSG_REQUIRED.to_string()][..]));
        }
    }

    #[test]
    fn missing_email_is_rejected() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("email");
        let errors = validate_and_shape(&body).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![fields::EMAIL]);
    }

    #[test]
    fn null_and_blank_values_are_rejected() {
        let mut body = valid_body();
        body["email"] = Value::Null;
        body["phone"] = json!("   ");
        let errors = validate_and_shape(&body).unwrap_err();
        assert_eq!(errors.get(fields::EMAIL), Some(&[MSG_NULL.to_string()][..]));
        assert_eq!(errors.get(fields::PHONE), Some(&[MSG_BLANK.to_string()][..]));
    }

    #[test]
    fn non_object_body_is_a_non_field_error() {
        let errors = validate_and_shape(&json!([1, 2])).unwrap_err();
        let messages = errors.get(fields::NON_FIELD).unwrap();
        assert!(messages[0].contains("got array"));
    }

    // -- Contact fields ------------------------------------------------------

    #[test]
    fn malformed_email_is_rejected() {
        let mut body = valid_body();
        body["email"] = json!("not-an-email");
        let errors = validate_and_shape(&body).unwrap_err();
        assert_eq!(
            errors.get(fields::EMAIL),
            Some(&["Enter a valid email address.".to_string()][..])
        );
        assert!(!errors.contains(fields::PHONE));
    }

    #[test]
    fn phone_longer_than_fifty_characters_is_rejected() {
        let mut body = valid_body();
        body["phone"] = json!("9".repeat(PHONE_MAX_LENGTH as usize + 1));
        let errors = validate_and_shape(&body).unwrap_err();
        assert!(errors.get(fields::PHONE).unwrap()[0].contains("50 characters"));
    }

    #[test]
    fn phone_length_counts_characters_not_bytes() {
        let mut body = valid_body();
        // Persian digits are two bytes each in UTF-8.
        body["phone"] = json!("۰".repeat(PHONE_MAX_LENGTH as usize));
        assert!(validate_and_shape(&body).is_ok());
    }

    #[test]
    fn overlong_email_is_rejected() {
        let mut body = valid_body();
        let local = "a".repeat(EMAIL_MAX_LENGTH as usize);
        body["email"] = json!(format!("{local}@b.com"));
        let errors = validate_and_shape(&body).unwrap_err();
        assert!(errors.contains(fields::EMAIL));
    }

    #[test]
    fn numeric_phone_is_not_a_string() {
        let mut body = valid_body();
        body["phone"] = json!(5551234);
        let errors = validate_and_shape(&body).unwrap_err();
        assert_eq!(errors.get(fields::PHONE), Some(&[MSG_NOT_STRING.to_string()][..]));
    }

    // -- Movies and ratings --------------------------------------------------

    #[test]
    fn movie_without_title_is_rejected_with_index() {
        let mut body = valid_body();
        body["selected_movies"] = json!([{"id": 1, "title": "A"}, {"id": 2}]);
        let errors = validate_and_shape(&body).unwrap_err();
        assert_eq!(
            errors.get(fields::SELECTED_MOVIES),
            Some(&["Item 1: \"title\" is required.".to_string()][..])
        );
    }

    #[test]
    fn movie_with_fractional_id_is_rejected() {
        let mut body = valid_body();
        body["selected_movies"] = json!([{"id": 1.5, "title": "A"}]);
        let errors = validate_and_shape(&body).unwrap_err();
        assert!(errors.get(fields::SELECTED_MOVIES).unwrap()[0].contains("string or integer"));
    }

    #[test]
    fn movies_must_be_a_list() {
        let mut body = valid_body();
        body["selected_movies"] = json!({"id": 1, "title": "A"});
        let errors = validate_and_shape(&body).unwrap_err();
        assert!(errors.get(fields::SELECTED_MOVIES).unwrap()[0].contains("\"object\""));
    }

    #[test]
    fn ratings_must_be_a_mapping() {
        let mut body = valid_body();
        body["movie_ratings"] = json!([5, 3]);
        let errors = validate_and_shape(&body).unwrap_err();
        assert!(errors.get(fields::MOVIE_RATINGS).unwrap()[0].contains("dictionary"));
    }

    // -- Null characters -----------------------------------------------------

    #[test]
    fn null_character_in_contact_fields_is_rejected() {
        let mut body = valid_body();
        body["email"] = json!("a\u{0}@b.com");
        body["phone"] = json!("12\u{0}3");
        let errors = validate_and_shape(&body).unwrap_err();
        assert_eq!(errors.get(fields::EMAIL), Some(&[MSG_NUL.to_string()][..]));
        assert_eq!(errors.get(fields::PHONE), Some(&[MSG_NUL.to_string()][..]));
    }

    #[test]
    fn null_character_in_movie_is_rejected_with_index() {
        let mut body = valid_body();
        body["selected_movies"] = json!([
            {"id": 1, "title": "Inception"},
            {"id": "row\u{0}2", "title": "In\u{0}ception"}
        ]);
        let errors = validate_and_shape(&body).unwrap_err();
        assert_eq!(
            errors.get(fields::SELECTED_MOVIES),
            Some(
                &[
                    "Item 1: \"id\" may not contain null characters.".to_string(),
                    "Item 1: \"title\" may not contain null characters.".to_string(),
                ][..]
            )
        );
    }

    #[test]
    fn null_character_anywhere_in_ratings_is_rejected() {
        for ratings in [
            json!({"1\u{0}": 5}),
            json!({"1": "five\u{0}"}),
            json!({"1": {"score": ["ok", "bad\u{0}"]}}),
        ] {
            let mut body = valid_body();
            body["movie_ratings"] = ratings;
            let errors = validate_and_shape(&body).unwrap_err();
            assert_eq!(errors.get(fields::MOVIE_RATINGS), Some(&[MSG_NUL.to_string()][..]));
        }
    }

    // -- FieldErrors ---------------------------------------------------------

    #[test]
    fn field_errors_serialize_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add("email", "bad");
        errors.add("email", "worse");
        errors.add("phone", "missing");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"email": ["bad", "worse"], "phone": ["missing"]})
        );
        assert_eq!(errors.to_string(), "email: bad; email: worse; phone: missing");
    }
}
