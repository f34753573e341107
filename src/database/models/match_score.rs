use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pre-computed by an external scoring process; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchScore {
    pub id: Uuid,
    pub business_id: Uuid,
    pub creator_id: Uuid,
    pub final_score: i32,
    pub niche_score: i32,
    pub region_score: i32,
    pub budget_score: i32,
    pub engagement_score: i32,
    pub calculated_at: DateTime<Utc>,
}
