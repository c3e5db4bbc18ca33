//! Request extractors that guard handlers.
//!
//! - [`admission::Admitted`] -- per-IP rate limit check for the submission endpoint.
//! - [`auth::AdminSession`] -- requires a valid admin Bearer token.

pub mod admission;
pub mod auth;
