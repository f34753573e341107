use serde_json::Value;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::AuditLog;

/// Append an audit record. Fire-and-forget by policy: the write runs on
/// a spawned task and failures are logged at warn, never surfaced to
/// the caller or the client.
pub fn append(
    actor_id: Option<Uuid>,
    action: &str,
    resource: &str,
    target_id: Option<String>,
    details: Value,
) {
    let action = action.to_string();
    let resource = resource.to_string();

    tokio::spawn(async move {
        if let Err(e) = insert(actor_id, &action, &resource, target_id.as_deref(), &details).await {
            tracing::warn!(
                action = %action,
                resource = %resource,
                "audit log write failed: {}",
                e
            );
        }
    });
}

/// Synchronous variant for call sites that must observe the failure
/// (none currently outside tests; transitions use `append`).
pub async fn insert(
    actor_id: Option<Uuid>,
    action: &str,
    resource: &str,
    target_id: Option<&str>,
    details: &Value,
) -> Result<(), crate::database::manager::DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    sqlx::query(
        "INSERT INTO audit_logs (actor_id, action, resource, target_id, details)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(actor_id)
    .bind(action)
    .bind(resource)
    .bind(target_id)
    .bind(details)
    .execute(&pool)
    .await?;

    Ok(())
}

/// Most recent entries for the admin console.
pub async fn recent(limit: i64) -> Result<Vec<AuditLog>, crate::database::manager::DatabaseError> {
    let pool = DatabaseManager::pool().await?;
    let logs = sqlx::query_as::<_, AuditLog>(
        "SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(&pool)
    .await?;
    Ok(logs)
}
