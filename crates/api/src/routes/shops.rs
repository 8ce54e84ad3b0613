//! Shop routes: CRUD and proximity search.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use nearshop_core::{GeoPoint, ShopId};

use super::{ApiJson, ApiPath, ApiQuery};
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::models::{Shop, ShopDraft};
use crate::services::shops::{DEFAULT_LIMIT, Page};
use crate::state::AppState;

/// Default search radius in kilometres.
const DEFAULT_RADIUS_KM: f64 = 1.0;

/// Create the shop routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shops", get(list).post(create))
        .route("/shops/nearby", get(nearby))
        .route("/shops/{id}", get(show).put(update).delete(destroy))
}

/// Shop create/replace payload.
#[derive(Debug, Deserialize)]
pub struct ShopCreate {
    pub name: String,
    pub owner: String,
    pub business_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl TryFrom<ShopCreate> for ShopDraft {
    type Error = AppError;

    fn try_from(payload: ShopCreate) -> Result<Self> {
        Ok(Self::new(
            payload.name,
            payload.owner,
            payload.business_type,
            payload.latitude,
            payload.longitude,
        )?)
    }
}

/// Query for `/shops/nearby`.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Kilometres.
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

const fn default_radius() -> f64 {
    DEFAULT_RADIUS_KM
}

const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Create a shop owned by the authenticated vendor.
async fn create(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    ApiJson(payload): ApiJson<ShopCreate>,
) -> Result<Json<Shop>> {
    let draft = ShopDraft::try_from(payload)?;
    let shop = state.shops().create(vendor.id, &draft).await?;
    Ok(Json(shop))
}

/// List shops by ID.
async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Page>,
) -> Result<Json<Vec<Shop>>> {
    Ok(Json(state.shops().list(page).await?))
}

/// Get a single shop.
async fn show(State(state): State<AppState>, ApiPath(id): ApiPath<ShopId>) -> Result<Json<Shop>> {
    Ok(Json(state.shops().get(id).await?))
}

/// Replace a shop. Only its owner may do this.
async fn update(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    ApiPath(id): ApiPath<ShopId>,
    ApiJson(payload): ApiJson<ShopCreate>,
) -> Result<Json<Shop>> {
    let draft = ShopDraft::try_from(payload)?;
    let shop = state.shops().update(vendor.id, id, &draft).await?;
    Ok(Json(shop))
}

/// Delete a shop. Only its owner may do this.
async fn destroy(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    ApiPath(id): ApiPath<ShopId>,
) -> Result<StatusCode> {
    state.shops().delete(vendor.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Shops within `radius` km of a point, nearest first.
async fn nearby(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NearbyQuery>,
) -> Result<Json<Vec<Shop>>> {
    let center = GeoPoint::new(query.latitude, query.longitude)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let page = Page {
        skip: query.skip,
        limit: query.limit,
    };

    let shops = state.shops().nearby(center, query.radius, page).await?;
    Ok(Json(shops))
}
