//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! nearshop migrate
//! ```
//!
//! # Environment Variables
//!
//! - `NEARSHOP_DATABASE_URL` - SQLite connection string (falls back to `DATABASE_URL`)
//!
//! Migrations are embedded from `crates/api/migrations/`.

use secrecy::SecretString;

use nearshop_api::db;

use super::CommandError;

/// Apply all pending migrations.
///
/// Only the database URL is needed, so this does not require the rest of the
/// API configuration (signing secret etc.) to be present.
pub async fn run() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("NEARSHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| {
            nearshop_api::config::ConfigError::MissingEnvVar("NEARSHOP_DATABASE_URL".to_string())
        })?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
