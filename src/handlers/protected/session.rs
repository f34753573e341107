use axum::{Extension, Json};
use serde::Deserialize;

use crate::database::models::{Profile, Role};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::profile_service::{self, Session};

/// GET /api/auth/whoami
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<Profile> {
    let profile = profile_service::whoami(user.user_id).await?;
    Ok(ApiResponse::success(profile))
}

#[derive(Debug, Deserialize)]
pub struct RoleSelection {
    pub role: Role,
}

/// POST /api/onboarding/role - one-way UNASSIGNED -> BUSINESS | CREATOR.
/// Returns a fresh session so the new role is live immediately.
pub async fn select_role(
    Extension(user): Extension<AuthUser>,
    Json(selection): Json<RoleSelection>,
) -> ApiResult<Session> {
    let session = profile_service::select_role(user.user_id, selection.role).await?;
    Ok(ApiResponse::success(session))
}
