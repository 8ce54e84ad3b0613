//! nearshop API library.
//!
//! Vendor accounts, bearer-token authentication, and shop management with
//! proximity search. Exposed as a library so the CLI and black-box tests can
//! reuse the router, repositories, and services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::{app, router};
pub use state::AppState;
