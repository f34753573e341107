use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::profile_service::{self, Session};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// POST /auth/register
pub async fn register(Json(creds): Json<Credentials>) -> ApiResult<Session> {
    let session = profile_service::register(&creds.email, &creds.password).await?;
    Ok(ApiResponse::created(session))
}

/// POST /auth/login
pub async fn login(Json(creds): Json<Credentials>) -> ApiResult<Session> {
    let session = profile_service::login(&creds.email, &creds.password).await?;
    Ok(ApiResponse::success(session))
}

/// POST /auth/logout
///
/// Tokens are stateless, so logout is a client-side discard; the
/// endpoint exists so the gate can always let sign-out through.
pub async fn logout() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "signed_out": true })))
}
