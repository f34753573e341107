use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Business, Creator, VerificationStatus};
use crate::services::alert_service;

use super::{audit, ServiceError, ServiceResult};

#[derive(Debug, Deserialize)]
pub struct BusinessForm {
    pub business_name: String,
    pub legal_entity_name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub operating_regions: Vec<String>,
    /// Final step submits the form for review.
    #[serde(default)]
    pub submit: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreatorForm {
    pub channel_name: String,
    pub primary_niche: Option<String>,
    #[serde(default)]
    pub total_followers: i64,
    #[serde(default)]
    pub average_reach: i64,
    #[serde(default)]
    pub engagement_ratio: f64,
    #[serde(default)]
    pub submit: bool,
}

pub async fn business_for_profile(profile_id: Uuid) -> ServiceResult<Business> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE profile_id = $1")
        .bind(profile_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Business profile not found".to_string()))
}

pub async fn creator_for_profile(profile_id: Uuid) -> ServiceResult<Creator> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query_as::<_, Creator>("SELECT * FROM creators WHERE profile_id = $1")
        .bind(profile_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Creator profile not found".to_string()))
}

/// Upsert the multi-step onboarding form. Submission moves the record
/// from PENDING_FORM to PENDING and notifies the operator.
pub async fn save_business_form(
    profile_id: Uuid,
    email: &str,
    form: BusinessForm,
) -> ServiceResult<Business> {
    if form.business_name.trim().is_empty() {
        return Err(ServiceError::Validation("Business name is required".to_string()));
    }

    let pool = DatabaseManager::pool().await?;
    let status = if form.submit {
        VerificationStatus::Pending
    } else {
        VerificationStatus::PendingForm
    };

    let business = sqlx::query_as::<_, Business>(
        "INSERT INTO businesses
             (profile_id, business_name, legal_entity_name, categories, operating_regions, verification_status)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (profile_id) DO UPDATE SET
             business_name = $2,
             legal_entity_name = $3,
             categories = $4,
             operating_regions = $5,
             verification_status = CASE
                 WHEN businesses.verification_status = 'PENDING_FORM' THEN $6
                 ELSE businesses.verification_status
             END
         RETURNING *",
    )
    .bind(profile_id)
    .bind(form.business_name.trim())
    .bind(&form.legal_entity_name)
    .bind(&form.categories)
    .bind(&form.operating_regions)
    .bind(status)
    .fetch_one(&pool)
    .await?;

    if form.submit {
        alert_service::send_alert_background("BUSINESS", &business.business_name, email);
    }

    Ok(business)
}

pub async fn save_creator_form(
    profile_id: Uuid,
    email: &str,
    form: CreatorForm,
) -> ServiceResult<Creator> {
    if form.channel_name.trim().is_empty() {
        return Err(ServiceError::Validation("Channel name is required".to_string()));
    }

    let pool = DatabaseManager::pool().await?;
    let status = if form.submit {
        VerificationStatus::Pending
    } else {
        VerificationStatus::PendingForm
    };

    let creator = sqlx::query_as::<_, Creator>(
        "INSERT INTO creators
             (profile_id, channel_name, primary_niche, total_followers, average_reach, engagement_ratio, verification_status)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (profile_id) DO UPDATE SET
             channel_name = $2,
             primary_niche = $3,
             total_followers = $4,
             average_reach = $5,
             engagement_ratio = $6,
             verification_status = CASE
                 WHEN creators.verification_status = 'PENDING_FORM' THEN $7
                 ELSE creators.verification_status
             END
         RETURNING *",
    )
    .bind(profile_id)
    .bind(form.channel_name.trim())
    .bind(&form.primary_niche)
    .bind(form.total_followers)
    .bind(form.average_reach)
    .bind(form.engagement_ratio)
    .bind(status)
    .fetch_one(&pool)
    .await?;

    if form.submit {
        alert_service::send_alert_background("CREATOR", &creator.channel_name, email);
    }

    Ok(creator)
}

pub async fn pending_businesses() -> ServiceResult<Vec<Business>> {
    let pool = DatabaseManager::pool().await?;
    let rows = sqlx::query_as::<_, Business>(
        "SELECT * FROM businesses WHERE verification_status = 'PENDING'
         ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(rows)
}

pub async fn pending_creators() -> ServiceResult<Vec<Creator>> {
    let pool = DatabaseManager::pool().await?;
    let rows = sqlx::query_as::<_, Creator>(
        "SELECT * FROM creators WHERE verification_status = 'PENDING'
         ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerKind {
    Businesses,
    Creators,
}

impl PartnerKind {
    fn table(self) -> &'static str {
        match self {
            PartnerKind::Businesses => "businesses",
            PartnerKind::Creators => "creators",
        }
    }
}

/// Admin decision on a pending partner. Guarded transition: only rows
/// currently PENDING are updated, so concurrent decisions conflict
/// instead of overwriting.
pub async fn decide_verification(
    actor: Uuid,
    kind: PartnerKind,
    id: Uuid,
    approved: bool,
) -> ServiceResult<()> {
    let status = if approved {
        VerificationStatus::Approved
    } else {
        VerificationStatus::Rejected
    };

    let pool = DatabaseManager::pool().await?;
    let query = format!(
        "UPDATE {} SET verification_status = $2
         WHERE id = $1 AND verification_status = 'PENDING'",
        kind.table()
    );

    let result = sqlx::query(&query).bind(id).bind(status).execute(&pool).await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::Conflict(
            "Record is not pending verification".to_string(),
        ));
    }

    audit::append(
        Some(actor),
        if approved { "VERIFY_APPROVED" } else { "VERIFY_REJECTED" },
        kind.table(),
        Some(id.to_string()),
        json!({}),
    );

    Ok(())
}
