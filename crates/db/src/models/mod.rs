//! Row models and DTOs, one module per table.

pub mod admin_user;
pub mod submission;
