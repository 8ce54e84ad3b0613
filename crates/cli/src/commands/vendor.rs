//! Vendor management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a vendor (password from --password or NEARSHOP_VENDOR_PASSWORD)
//! nearshop vendor create -n "Corner Bakery" -e owner@bakery.example
//!
//! # List vendors
//! nearshop vendor list --skip 0 --limit 50
//! ```

use nearshop_api::AppState;
use nearshop_api::db::VendorRepository;
use nearshop_api::models::Vendor;

use super::CommandError;

/// Create a new vendor and print its ID.
pub async fn create(
    state: &AppState,
    name: &str,
    email: &str,
    password: Option<&str>,
) -> Result<Vendor, CommandError> {
    let password = password.ok_or(CommandError::MissingPassword)?;

    tracing::info!("Creating vendor: {}", email);
    let vendor = state.auth().register(name, email, password).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Created vendor {} ({}) with id {}", vendor.name, vendor.email, vendor.id);
    }

    Ok(vendor)
}

/// Print one page of vendors, ordered by ID.
pub async fn list(state: &AppState, skip: i64, limit: i64) -> Result<Vec<Vendor>, CommandError> {
    let vendors = VendorRepository::new(state.pool())
        .list(skip.max(0), limit.clamp(0, 1000))
        .await?;

    #[allow(clippy::print_stdout)]
    {
        for vendor in &vendors {
            println!("{}\t{}\t{}", vendor.id, vendor.email, vendor.name);
        }
    }

    Ok(vendors)
}
