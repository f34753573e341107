use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Singleton row (id = 1). When the row is missing the API serves
/// in-memory defaults instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlatformSettings {
    pub id: i32,
    pub site_name: String,
    pub meta_title: String,
    pub meta_description: String,
    pub base_url: String,
    pub updated_at: DateTime<Utc>,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            id: 1,
            site_name: String::new(),
            meta_title: String::new(),
            meta_description: String::new(),
            base_url: String::new(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeatureFlag {
    pub id: Uuid,
    pub key: String,
    pub is_enabled_globally: bool,
    pub allowed_roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Singleton row (id = 1) read by the request gate on every request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct EmergencyControls {
    pub id: i32,
    pub kill_all_traffic: bool,
    pub kill_auth_system: bool,
}

impl Default for EmergencyControls {
    fn default() -> Self {
        Self {
            id: 1,
            kill_all_traffic: false,
            kill_auth_system: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LegalDocument {
    pub id: Uuid,
    pub doc_type: String,
    pub title: String,
    pub content: String,
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub resource: String,
    pub target_id: Option<String>,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}
