//! Bearer token command.
//!
//! # Usage
//!
//! ```bash
//! nearshop token issue -e owner@bakery.example
//! ```
//!
//! Prints a token signed with `NEARSHOP_JWT_SECRET`, valid for
//! `NEARSHOP_TOKEN_TTL_MINUTES`. The vendor must already exist.

use chrono::{DateTime, Utc};
use nearshop_api::AppState;
use nearshop_api::db::VendorRepository;
use nearshop_core::Email;

use super::CommandError;

/// Issue a token for an existing vendor, valid from `now`, and print it.
pub async fn issue(
    state: &AppState,
    email: &str,
    now: DateTime<Utc>,
) -> Result<String, CommandError> {
    let parsed = Email::parse(email).map_err(|_| CommandError::VendorNotFound(email.to_string()))?;
    let vendor = VendorRepository::new(state.pool())
        .get_by_email(&parsed)
        .await?
        .ok_or_else(|| CommandError::VendorNotFound(email.to_string()))?;

    let token = state.auth().issue_token(&vendor, now)?;
    tracing::info!(vendor_id = %vendor.id, ttl = %state.tokens().ttl(), "Token issued");

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }

    Ok(token)
}
