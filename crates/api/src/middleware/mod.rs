//! HTTP middleware for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Path normalization (trailing slash)
//! 2. Sentry layers (hub per request, HTTP transaction)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the span)
//! 5. CORS
//!
//! Authentication is an extractor (`RequireVendor`), not a layer, so public
//! routes never touch the token service.

pub mod auth;
pub mod request_id;

pub use auth::RequireVendor;
pub use request_id::request_id_middleware;
