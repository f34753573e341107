use axum::{extract::Path, Extension, Json};
use uuid::Uuid;

use crate::database::models::{CmsPage, CmsPageVersion};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::cms_service::{self, CreatePage, PageEditor, PreviewGrant, SavePage};

/// GET /api/admin/cms/pages
pub async fn list_pages(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<CmsPage>> {
    user.require_admin()?;
    let pages = cms_service::list_pages().await?;
    Ok(ApiResponse::success(pages))
}

/// POST /api/admin/cms/pages
pub async fn create_page(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreatePage>,
) -> ApiResult<CmsPage> {
    user.require_admin()?;
    let page = cms_service::create_page(user.user_id, input).await?;
    Ok(ApiResponse::created(page))
}

/// GET /api/admin/cms/pages/:id - the full editor payload.
pub async fn page_editor(
    Extension(user): Extension<AuthUser>,
    Path(page_id): Path<Uuid>,
) -> ApiResult<PageEditor> {
    user.require_admin()?;
    let editor = cms_service::page_editor(page_id).await?;
    Ok(ApiResponse::success(editor))
}

/// PUT /api/admin/cms/pages/:id - full save, with a version snapshot
/// when publishing.
pub async fn save_page(
    Extension(user): Extension<AuthUser>,
    Path(page_id): Path<Uuid>,
    Json(input): Json<SavePage>,
) -> ApiResult<CmsPage> {
    user.require_admin()?;
    let page = cms_service::save_page(user.user_id, page_id, input).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/admin/cms/pages/:id/versions/:version_id - snapshot for
/// the editor to load; restoring still goes through save.
pub async fn restore_payload(
    Extension(user): Extension<AuthUser>,
    Path((page_id, version_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<CmsPageVersion> {
    user.require_admin()?;
    let version = cms_service::restore_payload(page_id, version_id).await?;
    Ok(ApiResponse::success(version))
}

/// POST /api/admin/cms/pages/:id/preview - mint a one-hour share link.
pub async fn mint_preview(
    Extension(user): Extension<AuthUser>,
    Path(page_id): Path<Uuid>,
) -> ApiResult<PreviewGrant> {
    user.require_admin()?;
    let grant = cms_service::mint_preview_token(user.user_id, page_id).await?;
    Ok(ApiResponse::created(grant))
}
