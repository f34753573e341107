use axum::{extract::Path, Extension, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Asset, Booking};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::booking_service::{self, BookingRequest};
use crate::services::flag_service;

/// GET /api/marketplace/assets - available inventory.
pub async fn assets(Extension(_user): Extension<AuthUser>) -> ApiResult<Vec<Asset>> {
    let assets = booking_service::list_assets().await?;
    Ok(ApiResponse::success(assets))
}

/// GET /api/marketplace/assets/:id
pub async fn asset(
    Extension(_user): Extension<AuthUser>,
    Path(asset_id): Path<Uuid>,
) -> ApiResult<Asset> {
    let asset = booking_service::get_asset(asset_id).await?;
    Ok(ApiResponse::success(asset))
}

/// POST /api/marketplace/bookings - price is computed server-side.
pub async fn create_booking(
    Extension(user): Extension<AuthUser>,
    Json(req): Json<BookingRequest>,
) -> ApiResult<Booking> {
    let booking = booking_service::create_booking(user.user_id, req).await?;
    Ok(ApiResponse::created(booking))
}

/// GET /api/marketplace/bookings - the caller's bookings.
pub async fn bookings(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Booking>> {
    let bookings = booking_service::bookings_for(user.user_id).await?;
    Ok(ApiResponse::success(bookings))
}

/// GET /api/flags/:key/check - feature availability for the caller.
pub async fn check_flag(
    Extension(user): Extension<AuthUser>,
    Path(key): Path<String>,
) -> ApiResult<Value> {
    let enabled = flag_service::check_flag(&key, Some(user.role)).await;
    Ok(ApiResponse::success(json!({ "key": key, "enabled": enabled })))
}
