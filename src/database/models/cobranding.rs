use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "intent_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl IntentStatus {
    /// Legal transitions for an intent. PENDING is the only live state.
    pub fn can_transition_to(self, next: IntentStatus) -> bool {
        matches!(
            (self, next),
            (IntentStatus::Pending, IntentStatus::Accepted)
                | (IntentStatus::Pending, IntentStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "agreement_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "proof_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProofStatus {
    pub fn can_transition_to(self, next: ProofStatus) -> bool {
        matches!(
            (self, next),
            (ProofStatus::Pending, ProofStatus::Approved)
                | (ProofStatus::Pending, ProofStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "proof_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofType {
    Url,
    Screenshot,
    Document,
}

/// A service a business offers for cross-promotion. Soft-deleted via
/// `is_active = false`, never removed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoBrandingOption {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub expected_deliverable: String,
    pub execution_window_days: i32,
    pub proof_type: ProofType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// The proposal: requester offers one of its options in exchange for one
/// of the receiver's. Exactly one decision per intent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoBrandingIntent {
    pub id: Uuid,
    pub requester_business_id: Uuid,
    pub receiver_business_id: Uuid,
    pub requested_option_id: Uuid,
    pub offered_option_id: Uuid,
    pub status: IntentStatus,
    pub private_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoBrandingAgreement {
    pub id: Uuid,
    pub intent_id: Uuid,
    pub brand_a_id: Uuid,
    pub brand_b_id: Uuid,
    pub status: AgreementStatus,
    pub started_at: DateTime<Utc>,
    pub deadline_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoBrandingProof {
    pub id: Uuid,
    pub agreement_id: Uuid,
    pub business_id: Uuid,
    pub proof_data: String,
    pub proof_type: ProofType,
    pub admin_verification_status: ProofStatus,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_transitions_only_from_pending() {
        assert!(IntentStatus::Pending.can_transition_to(IntentStatus::Accepted));
        assert!(IntentStatus::Pending.can_transition_to(IntentStatus::Rejected));

        // terminal states never move again
        assert!(!IntentStatus::Accepted.can_transition_to(IntentStatus::Rejected));
        assert!(!IntentStatus::Accepted.can_transition_to(IntentStatus::Pending));
        assert!(!IntentStatus::Rejected.can_transition_to(IntentStatus::Accepted));
        assert!(!IntentStatus::Pending.can_transition_to(IntentStatus::Pending));
    }

    #[test]
    fn proof_transitions_only_from_pending() {
        assert!(ProofStatus::Pending.can_transition_to(ProofStatus::Approved));
        assert!(ProofStatus::Pending.can_transition_to(ProofStatus::Rejected));
        assert!(!ProofStatus::Approved.can_transition_to(ProofStatus::Rejected));
        assert!(!ProofStatus::Rejected.can_transition_to(ProofStatus::Approved));
    }
}
