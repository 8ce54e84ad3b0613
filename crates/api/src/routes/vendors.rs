//! Vendor registration, token exchange, and profile routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ApiForm, ApiJson};
use crate::error::{Result, set_sentry_user};
use crate::middleware::RequireVendor;
use crate::models::Vendor;
use crate::state::AppState;

/// Create the vendor routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vendors", post(register))
        .route("/vendors/token", post(token))
        .route("/vendors/me", get(me))
}

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct VendorCreate {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// OAuth2 password-grant style login form.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    /// The vendor's email.
    pub username: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Register a new vendor.
async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<VendorCreate>,
) -> Result<Json<Vendor>> {
    let vendor = state
        .auth()
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok(Json(vendor))
}

/// Exchange email and password for a bearer token.
async fn token(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<TokenForm>,
) -> Result<Json<TokenResponse>> {
    let auth = state.auth();
    let vendor = auth.login(&form.username, &form.password).await?;
    let access_token = auth.issue_token(&vendor, Utc::now())?;

    set_sentry_user(&vendor.id, Some(vendor.email.as_str()));
    tracing::info!(vendor_id = %vendor.id, "Token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// The authenticated vendor.
async fn me(RequireVendor(vendor): RequireVendor) -> Json<Vendor> {
    Json(vendor)
}
