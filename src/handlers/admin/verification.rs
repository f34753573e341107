use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Business, Creator};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::cobranding_service::{self, PendingProofRow, ProofDecisionOutcome};
use crate::services::verification_service::{self, PartnerKind};

/// GET /api/admin/verification - both pending queues.
pub async fn queues(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    user.require_admin()?;
    let businesses: Vec<Business> = verification_service::pending_businesses().await?;
    let creators: Vec<Creator> = verification_service::pending_creators().await?;
    Ok(ApiResponse::success(json!({
        "businesses": businesses,
        "creators": creators,
    })))
}

#[derive(Debug, Deserialize)]
pub struct Verdict {
    pub approved: bool,
}

/// PUT /api/admin/verification/:kind/:id - approve or reject. Only a
/// PENDING record can be decided; anything else conflicts.
pub async fn decide(
    Extension(user): Extension<AuthUser>,
    Path((kind, id)): Path<(PartnerKind, Uuid)>,
    Json(verdict): Json<Verdict>,
) -> ApiResult<Value> {
    user.require_admin()?;
    verification_service::decide_verification(user.user_id, kind, id, verdict.approved).await?;
    Ok(ApiResponse::success(json!({ "approved": verdict.approved })))
}

/// GET /api/admin/proofs - submitted proofs awaiting review.
pub async fn pending_proofs(
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<PendingProofRow>> {
    user.require_admin()?;
    let proofs = cobranding_service::pending_proofs().await?;
    Ok(ApiResponse::success(proofs))
}

/// PUT /api/admin/proofs/:id - verdict on a proof. Approval completes
/// the agreement.
pub async fn decide_proof(
    Extension(user): Extension<AuthUser>,
    Path(proof_id): Path<Uuid>,
    Json(verdict): Json<Verdict>,
) -> ApiResult<ProofDecisionOutcome> {
    user.require_admin()?;
    let outcome =
        cobranding_service::decide_proof(user.user_id, proof_id, verdict.approved).await?;
    Ok(ApiResponse::success(outcome))
}
