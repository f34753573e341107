use axum::{extract::Query, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::{alert_service, layout_cache};

#[derive(Debug, Deserialize)]
pub struct RevalidateQuery {
    pub secret: Option<String>,
}

/// POST /api/revalidate?secret=... - purge the cached layout so the
/// next public request rebuilds it. Shared-secret auth, not JWT: the
/// caller is an external publishing hook, not a logged-in user.
pub async fn revalidate(Query(query): Query<RevalidateQuery>) -> ApiResult<Value> {
    let expected = &config::config().security.revalidate_secret;

    let presented = query.secret.as_deref().unwrap_or_default();
    if expected.is_empty() || presented != expected {
        return Err(ApiError::unauthorized("Invalid token"));
    }

    layout_cache::purge().await;

    Ok(ApiResponse::success(json!({
        "revalidated": true,
        "now": Utc::now().timestamp_millis(),
    })))
}

/// POST /api/send-alert - relay a verification notification to the
/// operator. The body is a fixed template; callers cannot inject
/// arbitrary recipients or content.
pub async fn send_alert(
    Json(alert): Json<alert_service::AlertRequest>,
) -> ApiResult<Value> {
    alert_service::send_alert(&alert).await.map_err(|e| {
        tracing::warn!("operator alert failed: {}", e);
        ApiError::bad_gateway("Failed to deliver alert")
    })?;

    Ok(ApiResponse::success(json!({ "sent": true })))
}
