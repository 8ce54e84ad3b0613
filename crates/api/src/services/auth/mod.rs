//! Authentication service.
//!
//! Vendor registration, password login, and bearer token issuance/resolution.

mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::PasswordHasher;
pub use token::{TokenError, TokenService};

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use nearshop_core::Email;

use crate::db::RepositoryError;
use crate::db::vendors::VendorRepository;
use crate::models::Vendor;

/// Authentication service.
///
/// Handles vendor registration, login, and token issuance.
pub struct AuthService<'a> {
    vendors: VendorRepository<'a>,
    hasher: &'a PasswordHasher,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        pool: &'a SqlitePool,
        hasher: &'a PasswordHasher,
        tokens: &'a TokenService,
    ) -> Self {
        Self {
            vendors: VendorRepository::new(pool),
            hasher,
            tokens,
        }
    }

    /// Register a new vendor.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the name or password is empty.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::VendorAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Vendor, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("name cannot be empty".to_string()));
        }
        validate_password(password)?;
        let email = Email::parse(email)?;

        if self.vendors.get_by_email(&email).await?.is_some() {
            return Err(AuthError::VendorAlreadyExists);
        }

        let password_hash = self.hash_blocking(password).await?;

        // A concurrent registration can still win the race to the unique index.
        let vendor = self
            .vendors
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::VendorAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(vendor_id = %vendor.id, "Vendor registered");
        Ok(vendor)
    }

    /// Login with email and password.
    ///
    /// Unknown email, malformed email, and wrong password are indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Vendor, AuthError> {
        let record = match Email::parse(email) {
            Ok(email) => self.vendors.get_password_hash(&email).await?,
            Err(_) => None,
        };

        let Some((vendor, password_hash)) = record else {
            let hasher = self.hasher.clone();
            let password = password.to_string();
            let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_blocking(password, password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(vendor)
    }

    /// Issue a bearer token for a vendor.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue_token(&self, vendor: &Vendor, now: DateTime<Utc>) -> Result<String, AuthError> {
        Ok(self.tokens.issue(vendor.email.as_str(), now)?)
    }

    /// Resolve a bearer token to the vendor it names.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` if the token is invalid or its
    /// subject is not a registered vendor.
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Vendor, AuthError> {
        let subject = self
            .tokens
            .verify(token, now)
            .map_err(|_| AuthError::Unauthenticated)?;
        let email = Email::parse(&subject).map_err(|_| AuthError::Unauthenticated)?;

        self.vendors
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    async fn hash_blocking(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| AuthError::PasswordHash)?
    }

    async fn verify_blocking(&self, password: &str, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|_| AuthError::PasswordHash)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("password cannot be empty".to_string()));
    }
    Ok(())
}
