//! Ensure the configured superuser exists.
//!
//! Reads `SUPERUSER_USERNAME`, `SUPERUSER_PASSWORD` and optionally
//! `SUPERUSER_EMAIL`, then upserts the account. Prints one status line.
//! Exits 0 when unconfigured or on success; exits 1 only when the database
//! cannot be reached or written.

use std::process::ExitCode;

use reelpick_api::bootstrap::ensure_superuser;
use reelpick_api::telemetry::init_tracing;
use reelpick_core::superuser::{SuperuserConfig, NOT_CONFIGURED_MESSAGE};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing("reelpick_api=info,reelpick_db=info");

    let Some(config) = SuperuserConfig::from_env() else {
        println!("{NOT_CONFIGURED_MESSAGE}");
        return ExitCode::SUCCESS;
    };

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        tracing::error!("DATABASE_URL must be set");
        return ExitCode::FAILURE;
    };

    let pool = match reelpick_db::create_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = reelpick_db::run_migrations(&pool).await {
        tracing::error!(error = %e, "Failed to run database migrations");
        return ExitCode::FAILURE;
    }

    match ensure_superuser(&pool, &config).await {
        Ok(outcome) => {
            println!("{}", outcome.message());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, username = %config.username, "Superuser bootstrap failed");
            ExitCode::FAILURE
        }
    }
}
