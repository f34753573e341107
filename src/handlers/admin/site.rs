use axum::{Extension, Json};

use crate::database::models::{LegalDocument, NavigationItem, PlatformSettings};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::site_service::{self, LegalInput, NavigationInput, SettingsInput};

/// GET /api/admin/settings
pub async fn settings(Extension(user): Extension<AuthUser>) -> ApiResult<PlatformSettings> {
    user.require_admin()?;
    let settings = site_service::platform_settings().await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/admin/settings
pub async fn save_settings(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<SettingsInput>,
) -> ApiResult<PlatformSettings> {
    user.require_admin()?;
    let settings = site_service::save_platform_settings(user.user_id, input).await?;
    Ok(ApiResponse::success(settings))
}

/// GET /api/admin/navigation - every item, hidden ones included.
pub async fn navigation(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<NavigationItem>> {
    user.require_admin()?;
    let items = site_service::all_navigation().await?;
    Ok(ApiResponse::success(items))
}

/// PUT /api/admin/navigation - wholesale replacement, ordered by array
/// position.
pub async fn save_navigation(
    Extension(user): Extension<AuthUser>,
    Json(items): Json<Vec<NavigationInput>>,
) -> ApiResult<Vec<NavigationItem>> {
    user.require_admin()?;
    let items = site_service::save_navigation(user.user_id, items).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/admin/footer - every footer link, hidden ones included.
pub async fn footer_links(
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<crate::database::models::FooterLink>> {
    user.require_admin()?;
    let links = site_service::all_footer_links().await?;
    Ok(ApiResponse::success(links))
}

/// PUT /api/admin/footer
pub async fn save_footer_links(
    Extension(user): Extension<AuthUser>,
    Json(items): Json<Vec<NavigationInput>>,
) -> ApiResult<Vec<crate::database::models::FooterLink>> {
    user.require_admin()?;
    let links = site_service::save_footer_links(user.user_id, items).await?;
    Ok(ApiResponse::success(links))
}

/// GET /api/admin/legal - all versions, newest first per type.
pub async fn legal(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<LegalDocument>> {
    user.require_admin()?;
    let docs = site_service::legal_documents().await?;
    Ok(ApiResponse::success(docs))
}

/// POST /api/admin/legal - publish a new version, superseding the old.
pub async fn publish_legal(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<LegalInput>,
) -> ApiResult<LegalDocument> {
    user.require_admin()?;
    let doc = site_service::publish_legal_document(user.user_id, input).await?;
    Ok(ApiResponse::created(doc))
}
