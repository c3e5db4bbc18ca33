//! Admin authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 access tokens for the admin read view.

pub mod jwt;
pub mod password;
