//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ApiConfig;
use crate::services::auth::{AuthError, AuthService, PasswordHasher, TokenService};
use crate::services::shops::ShopService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and signing keys.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: SqlitePool,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - SQLite connection pool
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the Argon2 parameters are invalid.
    pub fn new(config: ApiConfig, pool: SqlitePool) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.auth.password)?;
        let tokens = TokenService::new(&config.auth.token);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                hasher,
                tokens,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Authentication service bound to this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.pool, &self.inner.hasher, &self.inner.tokens)
    }

    /// Shop service bound to this state.
    #[must_use]
    pub fn shops(&self) -> ShopService<'_> {
        ShopService::new(&self.inner.pool)
    }
}
