use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "verification_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    PendingForm,
    Pending,
    Approved,
    Rejected,
    Banned,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub business_name: String,
    pub legal_entity_name: Option<String>,
    pub categories: Vec<String>,
    pub operating_regions: Vec<String>,
    pub verification_status: VerificationStatus,
    pub co_branding_enabled: bool,
    pub co_branding_violation_count: i32,
    pub created_at: DateTime<Utc>,
}
