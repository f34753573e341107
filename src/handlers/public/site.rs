use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::LegalDocument;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::{cms_service, layout_cache, site_service};

/// GET /sitemap.xml
pub async fn sitemap() -> Result<Response, ApiError> {
    let xml = site_service::sitemap_xml().await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub preview: Option<Uuid>,
}

/// GET /pages/:slug - a rendered public page plus the shared layout.
pub async fn page(
    Path(slug): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<Value> {
    let rendered = cms_service::public_page(&slug, query.preview).await?;
    let layout = layout_cache::layout().await?;

    Ok(ApiResponse::success(json!({
        "layout": layout,
        "page": rendered.page,
        "sections": rendered.sections,
    })))
}

/// GET /legal/:doc_type - the active version of a legal document.
pub async fn legal(Path(doc_type): Path<String>) -> ApiResult<LegalDocument> {
    let doc = site_service::active_legal_document(&doc_type).await?;
    Ok(ApiResponse::success(doc))
}

/// GET /maintenance - the page the gate redirects to when traffic is
/// killed. Always served, never gated.
pub async fn maintenance() -> impl IntoResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        axum::Json(json!({
            "success": false,
            "error": "The platform is temporarily unavailable for maintenance",
            "code": "MAINTENANCE"
        })),
    )
}
