use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{
    AgreementStatus, CoBrandingAgreement, CoBrandingOption, CoBrandingProof, IntentStatus,
    ProofStatus, ProofType,
};

use super::{audit, ServiceError, ServiceResult};

/// Deadline for an agreement: started_at plus the offered option's
/// execution window.
pub fn compute_deadline(started_at: DateTime<Utc>, execution_window_days: i32) -> DateTime<Utc> {
    started_at + Duration::days(execution_window_days as i64)
}

// ---------------------------------------------------------------------------
// Options

#[derive(Debug, Deserialize)]
pub struct OptionForm {
    pub title: String,
    pub expected_deliverable: String,
    pub execution_window_days: i32,
    pub proof_type: ProofType,
}

pub async fn list_options(business_id: Uuid) -> ServiceResult<Vec<CoBrandingOption>> {
    let pool = DatabaseManager::pool().await?;
    let options = sqlx::query_as::<_, CoBrandingOption>(
        "SELECT * FROM co_branding_options
         WHERE business_id = $1 AND is_active = true
         ORDER BY created_at DESC",
    )
    .bind(business_id)
    .fetch_all(&pool)
    .await?;
    Ok(options)
}

pub async fn create_option(business_id: Uuid, form: OptionForm) -> ServiceResult<CoBrandingOption> {
    if form.title.trim().is_empty() {
        return Err(ServiceError::Validation("Option title is required".to_string()));
    }
    if form.execution_window_days <= 0 {
        return Err(ServiceError::Validation(
            "Execution window must be at least 1 day".to_string(),
        ));
    }

    let pool = DatabaseManager::pool().await?;
    let option = sqlx::query_as::<_, CoBrandingOption>(
        "INSERT INTO co_branding_options
             (business_id, title, expected_deliverable, execution_window_days, proof_type)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(business_id)
    .bind(form.title.trim())
    .bind(&form.expected_deliverable)
    .bind(form.execution_window_days)
    .bind(form.proof_type)
    .fetch_one(&pool)
    .await?;
    Ok(option)
}

/// Soft delete: options referenced by past intents must survive.
pub async fn deactivate_option(business_id: Uuid, option_id: Uuid) -> ServiceResult<()> {
    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query(
        "UPDATE co_branding_options SET is_active = false
         WHERE id = $1 AND business_id = $2",
    )
    .bind(option_id)
    .bind(business_id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Option not found".to_string()));
    }
    Ok(())
}

pub async fn set_enabled(business_id: Uuid, enabled: bool) -> ServiceResult<()> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query("UPDATE businesses SET co_branding_enabled = $2 WHERE id = $1")
        .bind(business_id)
        .bind(enabled)
        .execute(&pool)
        .await?;
    Ok(())
}

/// Approved businesses open to co-branding, excluding the caller.
pub async fn partner_directory(
    business_id: Uuid,
) -> ServiceResult<Vec<crate::database::models::Business>> {
    let pool = DatabaseManager::pool().await?;
    let partners = sqlx::query_as::<_, crate::database::models::Business>(
        "SELECT * FROM businesses
         WHERE co_branding_enabled = true
           AND verification_status = 'APPROVED'
           AND id <> $1
         ORDER BY business_name",
    )
    .bind(business_id)
    .fetch_all(&pool)
    .await?;
    Ok(partners)
}

// ---------------------------------------------------------------------------
// Intents

#[derive(Debug, Deserialize)]
pub struct CreateIntent {
    pub receiver_business_id: Uuid,
    pub requested_option_id: Uuid,
    pub offered_option_id: Uuid,
    pub private_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accepted,
    Rejected,
}

/// NONE -> PENDING. Both parties must have co-branding enabled and each
/// option must belong to the right side of the deal.
pub async fn create_intent(
    requester_business_id: Uuid,
    req: CreateIntent,
) -> ServiceResult<crate::database::models::CoBrandingIntent> {
    if req.receiver_business_id == requester_business_id {
        return Err(ServiceError::Validation(
            "Cannot propose a deal to your own business".to_string(),
        ));
    }

    let pool = DatabaseManager::pool().await?;

    let enabled: Vec<(Uuid, bool)> = sqlx::query_as(
        "SELECT id, co_branding_enabled FROM businesses WHERE id = ANY($1)",
    )
    .bind(vec![requester_business_id, req.receiver_business_id])
    .fetch_all(&pool)
    .await?;

    if enabled.len() != 2 {
        return Err(ServiceError::NotFound("Business not found".to_string()));
    }
    if enabled.iter().any(|(_, on)| !on) {
        return Err(ServiceError::Forbidden(
            "Both businesses must have co-branding enabled".to_string(),
        ));
    }

    let requested = fetch_active_option(&pool, req.requested_option_id).await?;
    if requested.business_id != req.receiver_business_id {
        return Err(ServiceError::Validation(
            "Requested option does not belong to the receiving business".to_string(),
        ));
    }

    let offered = fetch_active_option(&pool, req.offered_option_id).await?;
    if offered.business_id != requester_business_id {
        return Err(ServiceError::Validation(
            "Offered option does not belong to your business".to_string(),
        ));
    }

    let intent = sqlx::query_as::<_, crate::database::models::CoBrandingIntent>(
        "INSERT INTO co_branding_intents
             (requester_business_id, receiver_business_id, requested_option_id, offered_option_id, private_note)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(requester_business_id)
    .bind(req.receiver_business_id)
    .bind(req.requested_option_id)
    .bind(req.offered_option_id)
    .bind(&req.private_note)
    .fetch_one(&pool)
    .await?;

    audit::append(
        None,
        "INTENT_CREATED",
        "co_branding_intents",
        Some(intent.id.to_string()),
        json!({ "requester": requester_business_id, "receiver": req.receiver_business_id }),
    );

    Ok(intent)
}

async fn fetch_active_option(
    pool: &sqlx::PgPool,
    id: Uuid,
) -> ServiceResult<CoBrandingOption> {
    sqlx::query_as::<_, CoBrandingOption>(
        "SELECT * FROM co_branding_options WHERE id = $1 AND is_active = true",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Co-branding option not found".to_string()))
}

/// Inbox entry: a pending intent joined with requester and option details.
#[derive(Debug, Serialize, FromRow)]
pub struct InboxEntry {
    pub id: Uuid,
    pub requester_business_id: Uuid,
    pub requester_name: String,
    pub requester_legal_name: Option<String>,
    pub requested_title: String,
    pub requested_window_days: i32,
    pub offered_title: String,
    pub offered_window_days: i32,
    pub private_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn inbox(receiver_business_id: Uuid) -> ServiceResult<Vec<InboxEntry>> {
    let pool = DatabaseManager::pool().await?;
    let entries = sqlx::query_as::<_, InboxEntry>(
        "SELECT i.id,
                i.requester_business_id,
                rb.business_name AS requester_name,
                rb.legal_entity_name AS requester_legal_name,
                ro.title AS requested_title,
                ro.execution_window_days AS requested_window_days,
                oo.title AS offered_title,
                oo.execution_window_days AS offered_window_days,
                i.private_note,
                i.created_at
         FROM co_branding_intents i
         JOIN businesses rb ON rb.id = i.requester_business_id
         JOIN co_branding_options ro ON ro.id = i.requested_option_id
         JOIN co_branding_options oo ON oo.id = i.offered_option_id
         WHERE i.receiver_business_id = $1 AND i.status = 'PENDING'
         ORDER BY i.created_at DESC",
    )
    .bind(receiver_business_id)
    .fetch_all(&pool)
    .await?;
    Ok(entries)
}

#[derive(Debug, Serialize)]
pub struct DecisionOutcome {
    pub intent_id: Uuid,
    pub status: IntentStatus,
    /// Present when the decision was ACCEPTED.
    pub agreement: Option<CoBrandingAgreement>,
}

/// PENDING -> ACCEPTED | REJECTED, receiver only. Acceptance creates the
/// agreement inside the same transaction. The transition is guarded on
/// the current status, so a concurrent decision gets a conflict instead
/// of overwriting.
pub async fn decide_intent(
    receiver_business_id: Uuid,
    intent_id: Uuid,
    decision: Decision,
) -> ServiceResult<DecisionOutcome> {
    let new_status = match decision {
        Decision::Accepted => IntentStatus::Accepted,
        Decision::Rejected => IntentStatus::Rejected,
    };

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    let intent = sqlx::query_as::<_, crate::database::models::CoBrandingIntent>(
        "UPDATE co_branding_intents SET status = $3
         WHERE id = $1 AND receiver_business_id = $2 AND status = 'PENDING'
         RETURNING *",
    )
    .bind(intent_id)
    .bind(receiver_business_id)
    .bind(new_status)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(intent) = intent else {
        tx.rollback().await?;
        return Err(classify_decision_failure(&pool, intent_id, receiver_business_id, new_status).await);
    };

    let agreement = if new_status == IntentStatus::Accepted {
        let offered = sqlx::query_as::<_, CoBrandingOption>(
            "SELECT * FROM co_branding_options WHERE id = $1",
        )
        .bind(intent.offered_option_id)
        .fetch_one(&mut *tx)
        .await?;

        let started_at = Utc::now();
        let deadline_at = compute_deadline(started_at, offered.execution_window_days);

        let agreement = sqlx::query_as::<_, CoBrandingAgreement>(
            "INSERT INTO co_branding_agreements
                 (intent_id, brand_a_id, brand_b_id, status, started_at, deadline_at)
             VALUES ($1, $2, $3, 'ACTIVE', $4, $5)
             RETURNING *",
        )
        .bind(intent.id)
        .bind(intent.requester_business_id)
        .bind(intent.receiver_business_id)
        .bind(started_at)
        .bind(deadline_at)
        .fetch_one(&mut *tx)
        .await?;

        Some(agreement)
    } else {
        None
    };

    tx.commit().await?;

    audit::append(
        None,
        match decision {
            Decision::Accepted => "INTENT_ACCEPTED",
            Decision::Rejected => "INTENT_REJECTED",
        },
        "co_branding_intents",
        Some(intent.id.to_string()),
        json!({ "agreement_id": agreement.as_ref().map(|a| a.id) }),
    );

    Ok(DecisionOutcome {
        intent_id: intent.id,
        status: new_status,
        agreement,
    })
}

/// The guarded UPDATE matched nothing: work out whether that is a
/// missing intent, someone else's intent, or an illegal transition.
async fn classify_decision_failure(
    pool: &sqlx::PgPool,
    intent_id: Uuid,
    receiver_business_id: Uuid,
    new_status: IntentStatus,
) -> ServiceError {
    let row: Result<Option<(Uuid, IntentStatus)>, sqlx::Error> = sqlx::query_as(
        "SELECT receiver_business_id, status FROM co_branding_intents WHERE id = $1",
    )
    .bind(intent_id)
    .fetch_optional(pool)
    .await;

    match row {
        Ok(None) => ServiceError::NotFound("Proposal not found".to_string()),
        Ok(Some((receiver, _))) if receiver != receiver_business_id => {
            ServiceError::Forbidden("Only the receiving business can decide this proposal".to_string())
        }
        Ok(Some((_, status))) if !status.can_transition_to(new_status) => {
            ServiceError::Conflict("Proposal has already been decided".to_string())
        }
        Ok(Some(_)) => ServiceError::Conflict("Proposal could not be updated".to_string()),
        Err(e) => ServiceError::Sqlx(e),
    }
}

// ---------------------------------------------------------------------------
// Agreements & proofs

#[derive(Debug, Serialize, FromRow)]
pub struct AgreementRow {
    pub id: Uuid,
    pub intent_id: Uuid,
    pub brand_a_id: Uuid,
    pub brand_a_name: String,
    pub brand_b_id: Uuid,
    pub brand_b_name: String,
    pub status: AgreementStatus,
    pub started_at: DateTime<Utc>,
    pub deadline_at: DateTime<Utc>,
    pub requested_title: String,
    pub requested_deliverable: String,
    pub requested_proof_type: ProofType,
    pub offered_title: String,
    pub offered_deliverable: String,
    pub offered_proof_type: ProofType,
}

#[derive(Debug, Serialize)]
pub struct AgreementView {
    #[serde(flatten)]
    pub agreement: AgreementRow,
    pub proofs: Vec<CoBrandingProof>,
}

pub async fn agreements_for(business_id: Uuid) -> ServiceResult<Vec<AgreementView>> {
    let pool = DatabaseManager::pool().await?;

    let rows = sqlx::query_as::<_, AgreementRow>(
        "SELECT a.id, a.intent_id,
                a.brand_a_id, ba.business_name AS brand_a_name,
                a.brand_b_id, bb.business_name AS brand_b_name,
                a.status, a.started_at, a.deadline_at,
                ro.title AS requested_title,
                ro.expected_deliverable AS requested_deliverable,
                ro.proof_type AS requested_proof_type,
                oo.title AS offered_title,
                oo.expected_deliverable AS offered_deliverable,
                oo.proof_type AS offered_proof_type
         FROM co_branding_agreements a
         JOIN businesses ba ON ba.id = a.brand_a_id
         JOIN businesses bb ON bb.id = a.brand_b_id
         JOIN co_branding_intents i ON i.id = a.intent_id
         JOIN co_branding_options ro ON ro.id = i.requested_option_id
         JOIN co_branding_options oo ON oo.id = i.offered_option_id
         WHERE a.brand_a_id = $1 OR a.brand_b_id = $1
         ORDER BY a.started_at DESC",
    )
    .bind(business_id)
    .fetch_all(&pool)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let proofs = sqlx::query_as::<_, CoBrandingProof>(
        "SELECT * FROM co_branding_proofs WHERE agreement_id = ANY($1)
         ORDER BY submitted_at",
    )
    .bind(&ids)
    .fetch_all(&pool)
    .await?;

    let views = rows
        .into_iter()
        .map(|row| {
            let proofs = proofs
                .iter()
                .filter(|p| p.agreement_id == row.id)
                .cloned()
                .collect();
            AgreementView {
                agreement: row,
                proofs,
            }
        })
        .collect();

    Ok(views)
}

#[derive(Debug, Deserialize)]
pub struct ProofForm {
    pub proof_data: String,
    pub proof_type: ProofType,
}

/// At most one proof per (agreement, business); resubmission conflicts.
pub async fn submit_proof(
    business_id: Uuid,
    agreement_id: Uuid,
    form: ProofForm,
) -> ServiceResult<CoBrandingProof> {
    if form.proof_data.trim().is_empty() {
        return Err(ServiceError::Validation("Proof data is required".to_string()));
    }

    let pool = DatabaseManager::pool().await?;

    let agreement = sqlx::query_as::<_, CoBrandingAgreement>(
        "SELECT * FROM co_branding_agreements WHERE id = $1",
    )
    .bind(agreement_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Agreement not found".to_string()))?;

    if agreement.brand_a_id != business_id && agreement.brand_b_id != business_id {
        return Err(ServiceError::Forbidden(
            "Only a party to the agreement can submit proof".to_string(),
        ));
    }
    if agreement.status != AgreementStatus::Active {
        return Err(ServiceError::Conflict(
            "Agreement is no longer accepting proofs".to_string(),
        ));
    }

    let proof = sqlx::query_as::<_, CoBrandingProof>(
        "INSERT INTO co_branding_proofs (agreement_id, business_id, proof_data, proof_type)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(agreement_id)
    .bind(business_id)
    .bind(form.proof_data.trim())
    .bind(form.proof_type)
    .fetch_one(&pool)
    .await
    .map_err(|e| super::conflict_on_unique(e, "Proof already submitted for this agreement"))?;

    audit::append(
        None,
        "PROOF_SUBMITTED",
        "co_branding_proofs",
        Some(proof.id.to_string()),
        json!({ "agreement_id": agreement_id, "business_id": business_id }),
    );

    Ok(proof)
}

#[derive(Debug, Serialize, FromRow)]
pub struct PendingProofRow {
    pub id: Uuid,
    pub agreement_id: Uuid,
    pub business_id: Uuid,
    pub business_name: String,
    pub proof_data: String,
    pub proof_type: ProofType,
    pub expected_deliverable: String,
    pub deadline_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}

pub async fn pending_proofs() -> ServiceResult<Vec<PendingProofRow>> {
    let pool = DatabaseManager::pool().await?;
    let rows = sqlx::query_as::<_, PendingProofRow>(
        "SELECT p.id, p.agreement_id, p.business_id,
                b.business_name,
                p.proof_data, p.proof_type,
                CASE WHEN p.business_id = i.requester_business_id
                     THEN oo.expected_deliverable
                     ELSE ro.expected_deliverable
                END AS expected_deliverable,
                a.deadline_at, p.submitted_at
         FROM co_branding_proofs p
         JOIN businesses b ON b.id = p.business_id
         JOIN co_branding_agreements a ON a.id = p.agreement_id
         JOIN co_branding_intents i ON i.id = a.intent_id
         JOIN co_branding_options ro ON ro.id = i.requested_option_id
         JOIN co_branding_options oo ON oo.id = i.offered_option_id
         WHERE p.admin_verification_status = 'PENDING'
         ORDER BY p.submitted_at",
    )
    .fetch_all(&pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, Serialize)]
pub struct ProofDecisionOutcome {
    pub proof_id: Uuid,
    pub status: ProofStatus,
    pub agreement_status: AgreementStatus,
}

/// Admin verdict on a submitted proof. Approval marks the governing
/// agreement COMPLETED immediately, without waiting for the counterpart
/// proof - the platform's current business rule (see DESIGN.md). Both
/// writes share one transaction.
pub async fn decide_proof(
    actor: Uuid,
    proof_id: Uuid,
    approve: bool,
) -> ServiceResult<ProofDecisionOutcome> {
    let new_status = if approve {
        ProofStatus::Approved
    } else {
        ProofStatus::Rejected
    };

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    let proof = sqlx::query_as::<_, CoBrandingProof>(
        "UPDATE co_branding_proofs SET admin_verification_status = $2
         WHERE id = $1 AND admin_verification_status = 'PENDING'
         RETURNING *",
    )
    .bind(proof_id)
    .bind(new_status)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(proof) = proof else {
        tx.rollback().await?;
        return Err(classify_proof_failure(&pool, proof_id, new_status).await);
    };

    let agreement_status = if approve {
        let agreement = sqlx::query_as::<_, CoBrandingAgreement>(
            "UPDATE co_branding_agreements SET status = 'COMPLETED'
             WHERE id = $1
             RETURNING *",
        )
        .bind(proof.agreement_id)
        .fetch_one(&mut *tx)
        .await?;
        agreement.status
    } else {
        let agreement = sqlx::query_as::<_, CoBrandingAgreement>(
            "SELECT * FROM co_branding_agreements WHERE id = $1",
        )
        .bind(proof.agreement_id)
        .fetch_one(&mut *tx)
        .await?;
        agreement.status
    };

    tx.commit().await?;

    audit::append(
        Some(actor),
        if approve { "PROOF_APPROVED" } else { "PROOF_REJECTED" },
        "co_branding_proofs",
        Some(proof.id.to_string()),
        json!({ "agreement_id": proof.agreement_id }),
    );

    Ok(ProofDecisionOutcome {
        proof_id: proof.id,
        status: new_status,
        agreement_status,
    })
}

/// The guarded UPDATE matched nothing: the proof is either gone or no
/// longer in a state that allows this verdict.
async fn classify_proof_failure(
    pool: &sqlx::PgPool,
    proof_id: Uuid,
    new_status: ProofStatus,
) -> ServiceError {
    let row: Result<Option<(ProofStatus,)>, sqlx::Error> = sqlx::query_as(
        "SELECT admin_verification_status FROM co_branding_proofs WHERE id = $1",
    )
    .bind(proof_id)
    .fetch_optional(pool)
    .await;

    match row {
        Ok(None) => ServiceError::NotFound("Proof not found".to_string()),
        Ok(Some((status,))) if !status.can_transition_to(new_status) => {
            ServiceError::Conflict("Proof has already been verified".to_string())
        }
        Ok(Some(_)) => ServiceError::Conflict("Proof could not be updated".to_string()),
        Err(e) => ServiceError::Sqlx(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deadline_adds_execution_window() {
        let started = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let deadline = compute_deadline(started, 30);
        assert_eq!(deadline, Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn deadline_with_one_day_window() {
        let started = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        assert_eq!(
            compute_deadline(started, 1),
            Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 0).unwrap()
        );
    }
}
