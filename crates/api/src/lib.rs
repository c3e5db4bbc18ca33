//! reelpick API server library.
//!
//! Exposes config, state, error handling, routes and the superuser
//! bootstrap so that integration tests and both binaries share them.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod telemetry;
