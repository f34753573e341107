use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{EmergencyControls, FeatureFlag};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::{audit, flag_service};

/// GET /api/admin/flags
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<FeatureFlag>> {
    user.require_admin()?;
    let flags = flag_service::list_flags().await?;
    Ok(ApiResponse::success(flags))
}

#[derive(Debug, Deserialize)]
pub struct CreateFlag {
    pub key: String,
}

/// POST /api/admin/flags - keys are normalized to snake_case.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateFlag>,
) -> ApiResult<FeatureFlag> {
    user.require_admin()?;
    let flag = flag_service::create_flag(&input.key).await?;
    audit::append(
        Some(user.user_id),
        "FLAG_CREATED",
        "feature_flags",
        Some(flag.id.to_string()),
        json!({ "key": flag.key }),
    );
    Ok(ApiResponse::created(flag))
}

#[derive(Debug, Deserialize)]
pub struct ToggleFlag {
    pub enabled: bool,
}

/// PUT /api/admin/flags/:id
pub async fn toggle(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ToggleFlag>,
) -> ApiResult<FeatureFlag> {
    user.require_admin()?;
    let flag = flag_service::toggle_flag(id, input.enabled).await?;
    audit::append(
        Some(user.user_id),
        "FLAG_TOGGLED",
        "feature_flags",
        Some(id.to_string()),
        json!({ "key": flag.key, "enabled": input.enabled }),
    );
    Ok(ApiResponse::success(flag))
}

/// DELETE /api/admin/flags/:id
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    user.require_admin()?;
    flag_service::delete_flag(id).await?;
    audit::append(
        Some(user.user_id),
        "FLAG_DELETED",
        "feature_flags",
        Some(id.to_string()),
        json!({}),
    );
    Ok(ApiResponse::success(json!({ "deleted": true })))
}

/// GET /api/admin/emergency
pub async fn emergency(Extension(user): Extension<AuthUser>) -> ApiResult<EmergencyControls> {
    user.require_super_admin()?;
    let controls = flag_service::emergency_controls().await?;
    Ok(ApiResponse::success(controls))
}

#[derive(Debug, Deserialize)]
pub struct EmergencyInput {
    pub kill_all_traffic: bool,
    pub kill_auth_system: bool,
}

/// PUT /api/admin/emergency - the kill switches. SUPER_ADMIN only, and
/// every change is audited.
pub async fn set_emergency(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<EmergencyInput>,
) -> ApiResult<EmergencyControls> {
    user.require_super_admin()?;
    let controls =
        flag_service::set_emergency_controls(input.kill_all_traffic, input.kill_auth_system)
            .await?;
    audit::append(
        Some(user.user_id),
        "EMERGENCY_CONTROLS_SET",
        "emergency_controls",
        None,
        json!({
            "kill_all_traffic": input.kill_all_traffic,
            "kill_auth_system": input.kill_auth_system,
        }),
    );
    Ok(ApiResponse::success(controls))
}
