use axum::{extract::Path, Extension};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Role;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::match_service::{self, MatchRow};
use crate::services::verification_service;

/// GET /api/discover - the caller's pre-computed creator matches,
/// best score first.
pub async fn matches(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<MatchRow>> {
    user.require(Role::Business)?;
    let business = verification_service::business_for_profile(user.user_id).await?;
    let rows = match_service::matches_for(business.id).await?;
    Ok(ApiResponse::success(rows))
}

/// PUT /api/discover/saved/:creator_id - shortlist a creator.
pub async fn save(
    Extension(user): Extension<AuthUser>,
    Path(creator_id): Path<Uuid>,
) -> ApiResult<Value> {
    user.require(Role::Business)?;
    let business = verification_service::business_for_profile(user.user_id).await?;
    match_service::save_creator(business.id, creator_id).await?;
    Ok(ApiResponse::success(json!({ "saved": true })))
}

/// DELETE /api/discover/saved/:creator_id
pub async fn unsave(
    Extension(user): Extension<AuthUser>,
    Path(creator_id): Path<Uuid>,
) -> ApiResult<Value> {
    user.require(Role::Business)?;
    let business = verification_service::business_for_profile(user.user_id).await?;
    match_service::unsave_creator(business.id, creator_id).await?;
    Ok(ApiResponse::success(json!({ "saved": false })))
}
