use axum::{Extension, Json};

use crate::database::models::{Business, Creator, Role};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::verification_service::{self, BusinessForm, CreatorForm};

/// GET /api/onboarding/business - the caller's business record, for
/// resuming a half-finished form.
pub async fn get_business(Extension(user): Extension<AuthUser>) -> ApiResult<Business> {
    user.require(Role::Business)?;
    let business = verification_service::business_for_profile(user.user_id).await?;
    Ok(ApiResponse::success(business))
}

/// PUT /api/onboarding/business - save or submit the onboarding form.
pub async fn put_business(
    Extension(user): Extension<AuthUser>,
    Json(form): Json<BusinessForm>,
) -> ApiResult<Business> {
    user.require(Role::Business)?;
    let business =
        verification_service::save_business_form(user.user_id, &user.email, form).await?;
    Ok(ApiResponse::success(business))
}

/// GET /api/onboarding/creator
pub async fn get_creator(Extension(user): Extension<AuthUser>) -> ApiResult<Creator> {
    user.require(Role::Creator)?;
    let creator = verification_service::creator_for_profile(user.user_id).await?;
    Ok(ApiResponse::success(creator))
}

/// PUT /api/onboarding/creator
pub async fn put_creator(
    Extension(user): Extension<AuthUser>,
    Json(form): Json<CreatorForm>,
) -> ApiResult<Creator> {
    user.require(Role::Creator)?;
    let creator = verification_service::save_creator_form(user.user_id, &user.email, form).await?;
    Ok(ApiResponse::success(creator))
}
