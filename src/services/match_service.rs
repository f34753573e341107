use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;

use super::ServiceResult;

/// One row of a business's discovery feed: the pre-computed score
/// joined with the creator's public profile.
#[derive(Debug, Serialize, FromRow)]
pub struct MatchRow {
    pub creator_id: Uuid,
    pub channel_name: String,
    pub primary_niche: Option<String>,
    pub total_followers: i64,
    pub average_reach: i64,
    pub engagement_ratio: f64,
    pub final_score: i32,
    pub niche_score: i32,
    pub region_score: i32,
    pub budget_score: i32,
    pub engagement_score: i32,
    pub calculated_at: DateTime<Utc>,
    pub saved: bool,
}

/// Best matches first. Scores are computed by an external batch
/// process; this surface never writes match_scores.
pub async fn matches_for(business_id: Uuid) -> ServiceResult<Vec<MatchRow>> {
    let pool = DatabaseManager::pool().await?;
    let rows = sqlx::query_as::<_, MatchRow>(
        "SELECT m.creator_id,
                c.channel_name, c.primary_niche,
                c.total_followers, c.average_reach, c.engagement_ratio,
                m.final_score, m.niche_score, m.region_score,
                m.budget_score, m.engagement_score, m.calculated_at,
                (s.creator_id IS NOT NULL) AS saved
         FROM match_scores m
         JOIN creators c ON c.id = m.creator_id
         LEFT JOIN saved_creators s
                ON s.business_id = m.business_id AND s.creator_id = m.creator_id
         WHERE m.business_id = $1 AND c.verification_status = 'APPROVED'
         ORDER BY m.final_score DESC",
    )
    .bind(business_id)
    .fetch_all(&pool)
    .await?;
    Ok(rows)
}

pub async fn save_creator(business_id: Uuid, creator_id: Uuid) -> ServiceResult<()> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query(
        "INSERT INTO saved_creators (business_id, creator_id)
         VALUES ($1, $2)
         ON CONFLICT (business_id, creator_id) DO NOTHING",
    )
    .bind(business_id)
    .bind(creator_id)
    .execute(&pool)
    .await?;
    Ok(())
}

pub async fn unsave_creator(business_id: Uuid, creator_id: Uuid) -> ServiceResult<()> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query("DELETE FROM saved_creators WHERE business_id = $1 AND creator_id = $2")
        .bind(business_id)
        .bind(creator_id)
        .execute(&pool)
        .await?;
    Ok(())
}
