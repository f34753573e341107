use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{Json, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use crate::auth::Claims;
use crate::config;
use crate::database::models::Role;
use crate::error::ApiError;

/// Authenticated principal extracted from JWT. One typed context per
/// request replaces per-endpoint role sniffing.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl AuthUser {
    /// Enforce a minimum role. Fails closed with 403.
    pub fn require(&self, required: Role) -> Result<(), ApiError> {
        if self.role.satisfies(required) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "This action requires the {} role",
                required
            )))
        }
    }

    /// ADMIN or SUPER_ADMIN only.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Administrator access required"))
        }
    }

    pub fn require_super_admin(&self) -> Result<(), ApiError> {
        self.require(Role::SuperAdmin)
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        let api_error = ApiError::unauthorized(msg);
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    // Validate and decode JWT
    let claims = validate_jwt(&token).map_err(|msg| {
        let api_error = ApiError::unauthorized(msg);
        (
            StatusCode::from_u16(api_error.status_code()).unwrap(),
            Json(api_error.to_json()),
        )
    })?;

    // Convert claims to AuthUser and inject into request
    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@b.test".to_string(),
            role,
        }
    }

    #[test]
    fn admin_guard_fails_closed() {
        assert!(user(Role::SuperAdmin).require_admin().is_ok());
        assert!(user(Role::Admin).require_admin().is_ok());
        assert!(user(Role::Business).require_admin().is_err());
        assert!(user(Role::Creator).require_admin().is_err());
        assert!(user(Role::Unassigned).require_admin().is_err());
    }

    #[test]
    fn peer_roles_do_not_satisfy_each_other() {
        assert!(user(Role::Business).require(Role::Creator).is_err());
        assert!(user(Role::Creator).require(Role::Business).is_err());
        // admins satisfy either peer
        assert!(user(Role::Admin).require(Role::Business).is_ok());
        assert!(user(Role::Admin).require(Role::Creator).is_ok());
    }

    #[test]
    fn super_admin_guard() {
        assert!(user(Role::SuperAdmin).require_super_admin().is_ok());
        assert!(user(Role::Admin).require_super_admin().is_err());
    }
}
