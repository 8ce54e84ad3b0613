//! Password hashing with Argon2id.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;
use crate::config::PasswordConfig;

/// Fixed input for the hash that absorbs logins for unknown emails.
const DUMMY_PASSWORD: &str = "nearshop-dummy-password";

/// Hashes and verifies vendor passwords.
///
/// Output is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so a
/// hash carries the parameters and salt it was made with and stays verifiable
/// after the configured work factor changes.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Create a hasher with the given work factor.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the parameters are rejected by
    /// Argon2 (e.g. memory cost below `8 * parallelism`).
    pub fn new(config: PasswordConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|_| AuthError::PasswordHash)?;

        let dummy_hash = hash_with(&params, DUMMY_PASSWORD)?;

        Ok(Self { params, dummy_hash })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash_with(&self.params, password)
    }

    /// Check a password against a stored hash.
    ///
    /// Uses the algorithm, parameters and salt embedded in `hash`; the final
    /// comparison is constant-time. A malformed hash verifies as `false`.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spend the cost of one verification without a real account.
    ///
    /// Called on logins for unknown emails so they take as long as a wrong
    /// password for a known one. Always returns `false`.
    #[must_use]
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }
}

fn hash_with(params: &Params, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}
