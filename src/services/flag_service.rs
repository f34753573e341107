use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{EmergencyControls, FeatureFlag, Role};

use super::{ServiceError, ServiceResult};

/// Decide whether a flag is on for the given role. Pure so the
/// fail-closed rules are testable without a store.
pub fn flag_allows(flag: Option<&FeatureFlag>, role: Option<Role>) -> bool {
    let Some(flag) = flag else {
        return false; // missing flag row fails closed
    };

    if flag.is_enabled_globally {
        return true;
    }

    match role {
        Some(role) if !flag.allowed_roles.is_empty() => {
            let role_name = role.to_string();
            flag.allowed_roles.iter().any(|r| r == &role_name)
        }
        _ => false,
    }
}

/// Evaluate a flag key for a caller. A store error also fails closed.
pub async fn check_flag(key: &str, role: Option<Role>) -> bool {
    match fetch_flag(key).await {
        Ok(flag) => flag_allows(flag.as_ref(), role),
        Err(e) => {
            tracing::warn!(key = %key, "flag lookup failed, failing closed: {}", e);
            false
        }
    }
}

async fn fetch_flag(key: &str) -> Result<Option<FeatureFlag>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;
    let flag = sqlx::query_as::<_, FeatureFlag>("SELECT * FROM feature_flags WHERE key = $1")
        .bind(key)
        .fetch_optional(&pool)
        .await?;
    Ok(flag)
}

pub async fn list_flags() -> ServiceResult<Vec<FeatureFlag>> {
    let pool = DatabaseManager::pool().await?;
    let flags =
        sqlx::query_as::<_, FeatureFlag>("SELECT * FROM feature_flags ORDER BY created_at DESC")
            .fetch_all(&pool)
            .await?;
    Ok(flags)
}

pub async fn create_flag(key: &str) -> ServiceResult<FeatureFlag> {
    let normalized: String = key
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    if normalized.is_empty() {
        return Err(ServiceError::Validation("Flag key is required".to_string()));
    }

    let pool = DatabaseManager::pool().await?;
    let flag = sqlx::query_as::<_, FeatureFlag>(
        "INSERT INTO feature_flags (key, is_enabled_globally, allowed_roles)
         VALUES ($1, false, '{}')
         RETURNING *",
    )
    .bind(&normalized)
    .fetch_one(&pool)
    .await
    .map_err(|e| super::conflict_on_unique(e, &format!("Flag '{}' already exists", normalized)))?;

    Ok(flag)
}

pub async fn toggle_flag(id: Uuid, enabled: bool) -> ServiceResult<FeatureFlag> {
    let pool = DatabaseManager::pool().await?;
    let flag = sqlx::query_as::<_, FeatureFlag>(
        "UPDATE feature_flags SET is_enabled_globally = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(enabled)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Flag not found".to_string()))?;

    Ok(flag)
}

pub async fn delete_flag(id: Uuid) -> ServiceResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("DELETE FROM feature_flags WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Flag not found".to_string()));
    }
    Ok(())
}

/// Read the emergency-controls singleton. Missing row means defaults.
pub async fn emergency_controls() -> Result<EmergencyControls, DatabaseError> {
    let pool = DatabaseManager::pool().await?;
    let controls = sqlx::query_as::<_, EmergencyControls>(
        "SELECT id, kill_all_traffic, kill_auth_system FROM emergency_controls WHERE id = 1",
    )
    .fetch_optional(&pool)
    .await?;
    Ok(controls.unwrap_or_default())
}

pub async fn set_emergency_controls(
    kill_all_traffic: bool,
    kill_auth_system: bool,
) -> ServiceResult<EmergencyControls> {
    let pool = DatabaseManager::pool().await?;
    let controls = sqlx::query_as::<_, EmergencyControls>(
        "INSERT INTO emergency_controls (id, kill_all_traffic, kill_auth_system)
         VALUES (1, $1, $2)
         ON CONFLICT (id) DO UPDATE
         SET kill_all_traffic = $1, kill_auth_system = $2, updated_at = now()
         RETURNING id, kill_all_traffic, kill_auth_system",
    )
    .bind(kill_all_traffic)
    .bind(kill_auth_system)
    .fetch_one(&pool)
    .await?;

    Ok(controls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn flag(globally: bool, roles: &[&str]) -> FeatureFlag {
        FeatureFlag {
            id: Uuid::new_v4(),
            key: "beta_chat".to_string(),
            is_enabled_globally: globally,
            allowed_roles: roles.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_flag_fails_closed() {
        assert!(!flag_allows(None, Some(Role::SuperAdmin)));
        assert!(!flag_allows(None, None));
    }

    #[test]
    fn global_flag_is_on_for_everyone() {
        let f = flag(true, &[]);
        assert!(flag_allows(Some(&f), None));
        assert!(flag_allows(Some(&f), Some(Role::Unassigned)));
    }

    #[test]
    fn role_scoped_flag() {
        let f = flag(false, &["BUSINESS", "ADMIN"]);
        assert!(flag_allows(Some(&f), Some(Role::Business)));
        assert!(flag_allows(Some(&f), Some(Role::Admin)));
        assert!(!flag_allows(Some(&f), Some(Role::Creator)));
        assert!(!flag_allows(Some(&f), None));
    }

    #[test]
    fn disabled_flag_with_no_roles_is_off() {
        let f = flag(false, &[]);
        assert!(!flag_allows(Some(&f), Some(Role::SuperAdmin)));
    }
}
