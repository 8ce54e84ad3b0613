//! Domain models for the API.
//!
//! These types are validated domain objects, separate from database row types
//! and from request payloads.

pub mod shop;
pub mod vendor;

pub use shop::{Shop, ShopDraft, ShopDraftError};
pub use vendor::Vendor;
