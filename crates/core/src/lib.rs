//! Domain logic for the reelpick intake service.
//!
//! Pure code only: no database, no HTTP. Shared by the repository layer,
//! the API server and the bootstrap command.

pub mod error;
pub mod rate_limit;
pub mod submission;
pub mod summary;
pub mod superuser;
pub mod types;
