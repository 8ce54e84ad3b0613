//! nearshop Core - Shared types library.
//!
//! This crate provides common types used across all nearshop components:
//! - `api` - HTTP service for vendors and shops
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`geo`] - Validated coordinates and great-circle distance

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod geo;
pub mod types;

pub use geo::{CoordinateError, EARTH_RADIUS_KM, GeoPoint};
pub use types::*;
