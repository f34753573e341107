use axum::{extract::Path, Extension};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::AuditLog;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::{audit, profile_service};
use crate::services::profile_service::AdminUserRow;

/// GET /api/admin/users
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<AdminUserRow>> {
    user.require_admin()?;
    let users = profile_service::list_users().await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/admin/users/:id/ban - every partner record for the user
/// becomes BANNED.
pub async fn ban(
    Extension(user): Extension<AuthUser>,
    Path(target): Path<Uuid>,
) -> ApiResult<Value> {
    user.require_admin()?;
    profile_service::ban_user(user.user_id, target).await?;
    Ok(ApiResponse::success(json!({ "banned": true })))
}

/// POST /api/admin/users/:id/unban
pub async fn unban(
    Extension(user): Extension<AuthUser>,
    Path(target): Path<Uuid>,
) -> ApiResult<Value> {
    user.require_admin()?;
    profile_service::unban_user(user.user_id, target).await?;
    Ok(ApiResponse::success(json!({ "banned": false })))
}

/// POST /api/admin/users/:id/approve - force-approve outside the queue.
pub async fn approve(
    Extension(user): Extension<AuthUser>,
    Path(target): Path<Uuid>,
) -> ApiResult<Value> {
    user.require_admin()?;
    profile_service::approve_user(user.user_id, target).await?;
    Ok(ApiResponse::success(json!({ "approved": true })))
}

/// POST /api/admin/users/:id/promote - SUPER_ADMIN only.
pub async fn promote(
    Extension(user): Extension<AuthUser>,
    Path(target): Path<Uuid>,
) -> ApiResult<Value> {
    user.require_super_admin()?;
    profile_service::promote_user(user.user_id, target).await?;
    Ok(ApiResponse::success(json!({ "promoted": true })))
}

/// GET /api/admin/audit - recent admin actions.
pub async fn audit_log(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<AuditLog>> {
    user.require_admin()?;
    let logs = audit::recent(200).await?;
    Ok(ApiResponse::success(logs))
}
