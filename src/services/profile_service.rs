use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Profile, Role, VerificationStatus};

use super::{audit, ServiceError, ServiceResult};

#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    /// Where the client should land after login, derived from the role.
    pub landing: &'static str,
    pub expires_in: u64,
}

fn session_for(profile: &Profile) -> ServiceResult<Session> {
    let claims = Claims::new(profile.id, profile.email.clone(), profile.role);
    let token = auth::generate_jwt(claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ServiceError::Unauthorized("Failed to issue session token".to_string())
    })?;

    Ok(Session {
        token,
        user_id: profile.id,
        email: profile.email.clone(),
        role: profile.role,
        landing: profile.role.landing_route(),
        expires_in: config::config().security.jwt_expiry_hours * 3600,
    })
}

pub async fn register(email: &str, password: &str) -> ServiceResult<Session> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::Validation("A valid email is required".to_string()));
    }
    if password.len() < 8 {
        return Err(ServiceError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let pool = DatabaseManager::pool().await?;
    let digest = auth::new_password_digest(password);

    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (email, password_digest) VALUES ($1, $2) RETURNING *",
    )
    .bind(&email)
    .bind(&digest)
    .fetch_one(&pool)
    .await
    .map_err(|e| super::conflict_on_unique(e, "An account with this email already exists"))?;

    session_for(&profile)
}

pub async fn login(email: &str, password: &str) -> ServiceResult<Session> {
    let email = email.trim().to_lowercase();
    let pool = DatabaseManager::pool().await?;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("Invalid email or password".to_string()))?;

    if !auth::verify_password(password, &profile.password_digest) {
        return Err(ServiceError::Unauthorized("Invalid email or password".to_string()));
    }

    sqlx::query("UPDATE profiles SET last_sign_in_at = now() WHERE id = $1")
        .bind(profile.id)
        .execute(&pool)
        .await?;

    session_for(&profile)
}

pub async fn whoami(user_id: Uuid) -> ServiceResult<Profile> {
    let pool = DatabaseManager::pool().await?;
    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Profile not found".to_string()))?;
    Ok(profile)
}

/// One-way role selection: UNASSIGNED may pick BUSINESS or CREATOR.
pub async fn select_role(user_id: Uuid, role: Role) -> ServiceResult<Session> {
    if !matches!(role, Role::Business | Role::Creator) {
        return Err(ServiceError::Validation(
            "Role selection is limited to BUSINESS or CREATOR".to_string(),
        ));
    }

    let pool = DatabaseManager::pool().await?;
    let profile = sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET role = $2 WHERE id = $1 AND role = 'UNASSIGNED' RETURNING *",
    )
    .bind(user_id)
    .bind(role)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| {
        ServiceError::Conflict("Role has already been selected for this account".to_string())
    })?;

    // Fresh token so the new role takes effect immediately
    session_for(&profile)
}

/// One row of the moderation console's user list.
#[derive(Debug, Serialize, FromRow)]
pub struct AdminUserRow {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub business_name: Option<String>,
    pub business_status: Option<VerificationStatus>,
    pub channel_name: Option<String>,
    pub creator_status: Option<VerificationStatus>,
}

pub async fn list_users() -> ServiceResult<Vec<AdminUserRow>> {
    let pool = DatabaseManager::pool().await?;
    let rows = sqlx::query_as::<_, AdminUserRow>(
        "SELECT p.id, p.email, p.role, p.created_at, p.last_sign_in_at,
                b.business_name, b.verification_status AS business_status,
                c.channel_name, c.verification_status AS creator_status
         FROM profiles p
         LEFT JOIN businesses b ON b.profile_id = p.id
         LEFT JOIN creators c ON c.profile_id = p.id
         ORDER BY p.created_at DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(rows)
}

/// Flip both of a user's partner records to a status in one transaction.
async fn set_partner_status(
    target: Uuid,
    from: Option<VerificationStatus>,
    to: VerificationStatus,
) -> ServiceResult<()> {
    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    match from {
        Some(from) => {
            sqlx::query(
                "UPDATE businesses SET verification_status = $2
                 WHERE profile_id = $1 AND verification_status = $3",
            )
            .bind(target)
            .bind(to)
            .bind(from)
            .execute(&mut *tx)
            .await?;
            sqlx::query(
                "UPDATE creators SET verification_status = $2
                 WHERE profile_id = $1 AND verification_status = $3",
            )
            .bind(target)
            .bind(to)
            .bind(from)
            .execute(&mut *tx)
            .await?;
        }
        None => {
            sqlx::query("UPDATE businesses SET verification_status = $2 WHERE profile_id = $1")
                .bind(target)
                .bind(to)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE creators SET verification_status = $2 WHERE profile_id = $1")
                .bind(target)
                .bind(to)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}

/// Platform-wide ban: every partner record for the user becomes
/// BANNED.
pub async fn ban_user(actor: Uuid, target: Uuid) -> ServiceResult<()> {
    set_partner_status(target, None, VerificationStatus::Banned).await?;
    audit::append(
        Some(actor),
        "BAN_USER",
        "profiles",
        Some(target.to_string()),
        json!({}),
    );
    Ok(())
}

pub async fn unban_user(actor: Uuid, target: Uuid) -> ServiceResult<()> {
    set_partner_status(
        target,
        Some(VerificationStatus::Banned),
        VerificationStatus::Approved,
    )
    .await?;
    audit::append(
        Some(actor),
        "UNBAN_USER",
        "profiles",
        Some(target.to_string()),
        json!({}),
    );
    Ok(())
}

pub async fn approve_user(actor: Uuid, target: Uuid) -> ServiceResult<()> {
    set_partner_status(target, None, VerificationStatus::Approved).await?;
    audit::append(
        Some(actor),
        "FORCE_APPROVE",
        "profiles",
        Some(target.to_string()),
        json!({}),
    );
    Ok(())
}

/// SUPER_ADMIN-only promotion.
pub async fn promote_user(actor: Uuid, target: Uuid) -> ServiceResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("UPDATE profiles SET role = 'SUPER_ADMIN' WHERE id = $1")
        .bind(target)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Profile not found".to_string()));
    }

    audit::append(
        Some(actor),
        "PROMOTE_SUPER_ADMIN",
        "profiles",
        Some(target.to_string()),
        json!({}),
    );
    Ok(())
}
