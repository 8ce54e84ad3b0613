//! Signed bearer tokens (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TokenConfig;

/// Token errors.
///
/// Verification failures are deliberately undifferentiated.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is malformed, tampered with, expired, or lacks a subject.
    #[error("invalid token")]
    Invalid,

    /// The token could not be signed.
    #[error("token encoding failed: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),

    /// `now + ttl` does not fit in a timestamp.
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    /// Subject (the vendor's email).
    sub: String,
    /// Issued-at, unix seconds. Absent in `{sub, exp}`-only tokens.
    #[serde(default)]
    iat: i64,
    /// Expiry, unix seconds (exclusive).
    exp: i64,
}

/// Issues and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from explicit configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the caller's `now` in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: config.ttl,
        }
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Issue a token for `subject`, valid from `now` until `now + ttl`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::ExpiryOutOfRange` if the expiry overflows, or
    /// `TokenError::Encode` if signing fails.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify a token and return its subject.
    ///
    /// Valid iff the signature checks out, the subject is non-empty, and
    /// `iat <= now < exp`.
    ///
    /// `iat` and `exp` are whole epoch seconds and `now` is truncated to the
    /// second before comparing, so the window is only exact to the second: a
    /// token issued at `12:00:00.900` is already valid at `12:00:00.100` and
    /// expires at `12:30:00.000` with a 30 minute TTL.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` on any failure.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::Invalid
            })?;
        let claims = data.claims;
        let now = now.timestamp();

        if claims.sub.is_empty() {
            tracing::debug!("Token rejected: empty subject");
            return Err(TokenError::Invalid);
        }
        if claims.exp <= now {
            tracing::debug!(exp = claims.exp, now, "Token rejected: expired");
            return Err(TokenError::Invalid);
        }
        if claims.iat > now {
            tracing::debug!(iat = claims.iat, now, "Token rejected: issued in the future");
            return Err(TokenError::Invalid);
        }

        Ok(claims.sub)
    }
}
