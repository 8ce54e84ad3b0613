//! Database operations for the nearshop SQLite store.
//!
//! ## Tables
//!
//! - `vendors` - Vendor accounts (email is unique, password stored as Argon2 hash)
//! - `shops` - Shops, each owned by exactly one vendor
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/`, embedded into the binary,
//! and applied at startup (unless `NEARSHOP_AUTO_MIGRATE=false`) or via:
//! ```bash
//! cargo run -p nearshop-cli -- migrate
//! ```
//!
//! # Connection scope
//!
//! Repositories borrow the pool and check out a connection per statement. The
//! connection goes back to the pool when the query future completes or is
//! dropped, so every exit path (success, business error, or failure) releases it.

pub mod shops;
pub mod vendors;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use shops::ShopRepository;
pub use vendors::VendorRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if it does not exist. Foreign keys are
/// enforced on every connection.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a single-connection in-memory pool with migrations applied.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to exactly one connection that never expires.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection or a migration fails.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns `sqlx::Error` if any migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
