//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod admin_user_repo;
pub mod submission_repo;

pub use admin_user_repo::AdminUserRepo;
pub use submission_repo::SubmissionRepo;
