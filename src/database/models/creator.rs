use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::business::VerificationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Creator {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub channel_name: String,
    pub primary_niche: Option<String>,
    pub total_followers: i64,
    pub average_reach: i64,
    pub engagement_ratio: f64,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}
