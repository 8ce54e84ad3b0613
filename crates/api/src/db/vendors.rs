//! Vendor repository for database operations.

use sqlx::SqlitePool;

use nearshop_core::{Email, VendorId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::Vendor;

/// Repository for vendor database operations.
pub struct VendorRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VendorRepository<'a> {
    /// Create a new vendor repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a vendor by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Vendor>, RepositoryError> {
        let vendor = sqlx::query_as::<_, Vendor>(
            r"
            SELECT id, name, email
            FROM vendors
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(vendor)
    }

    /// Get a vendor by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        let vendor = sqlx::query_as::<_, Vendor>(
            r"
            SELECT id, name, email
            FROM vendors
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(vendor)
    }

    /// Create a new vendor with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Vendor, RepositoryError> {
        let vendor = sqlx::query_as::<_, Vendor>(
            r"
            INSERT INTO vendors (name, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        Ok(vendor)
    }

    /// Get a vendor's password hash by email.
    ///
    /// Returns `None` if the vendor doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Vendor, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (VendorId, String, Email, String)>(
            r"
            SELECT id, name, email, hashed_password
            FROM vendors
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, name, email, password_hash)| {
            (Vendor { id, name, email }, password_hash)
        }))
    }

    /// List vendors ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Vendor>, RepositoryError> {
        let vendors = sqlx::query_as::<_, Vendor>(
            r"
            SELECT id, name, email
            FROM vendors
            ORDER BY id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(vendors)
    }
}
