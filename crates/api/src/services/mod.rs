//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Vendor registration, password login, bearer tokens
//! - `shops` - Shop CRUD with ownership checks, proximity search

pub mod auth;
pub mod shops;

pub use auth::{AuthError, AuthService, PasswordHasher, TokenError, TokenService};
pub use shops::{Page, ShopError, ShopService};
