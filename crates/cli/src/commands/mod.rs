//! CLI subcommands.

pub mod migrate;
pub mod token;
pub mod vendor;

use nearshop_api::AppState;
use nearshop_api::config::{ApiConfig, ConfigError};
use nearshop_api::db;
use nearshop_api::services::AuthError;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection or migration error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] db::RepositoryError),

    /// Registration or token issuance failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// No password given on the command line or in the environment.
    #[error("No password given: pass --password or set NEARSHOP_VENDOR_PASSWORD")]
    MissingPassword,

    /// No vendor has the given email.
    #[error("No vendor with email: {0}")]
    VendorNotFound(String),
}

/// Load the API configuration and connect to its database.
///
/// # Errors
///
/// Returns `CommandError` if the configuration is incomplete or the database
/// cannot be reached.
pub async fn connect() -> Result<AppState, CommandError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    Ok(AppState::new(config, pool)?)
}
