use axum::{
    extract::Path,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Business, CoBrandingIntent, CoBrandingOption, CoBrandingProof, Role, VerificationStatus};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::cobranding_service::{
    self, AgreementView, CreateIntent, Decision, DecisionOutcome, InboxEntry, OptionForm,
    ProofForm,
};
use crate::services::verification_service;

/// Co-branding is open to approved businesses only.
async fn approved_business(user: &AuthUser) -> Result<Business, ApiError> {
    user.require(Role::Business)?;
    let business = verification_service::business_for_profile(user.user_id).await?;
    if business.verification_status != VerificationStatus::Approved {
        return Err(ApiError::forbidden(
            "Co-branding requires an approved business account",
        ));
    }
    Ok(business)
}

/// GET /api/cobranding/options - the caller's own active options.
pub async fn list_options(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<CoBrandingOption>> {
    let business = approved_business(&user).await?;
    let options = cobranding_service::list_options(business.id).await?;
    Ok(ApiResponse::success(options))
}

/// POST /api/cobranding/options
pub async fn create_option(
    Extension(user): Extension<AuthUser>,
    Json(form): Json<OptionForm>,
) -> ApiResult<CoBrandingOption> {
    let business = approved_business(&user).await?;
    let option = cobranding_service::create_option(business.id, form).await?;
    Ok(ApiResponse::created(option))
}

/// DELETE /api/cobranding/options/:id - soft delete.
pub async fn delete_option(
    Extension(user): Extension<AuthUser>,
    Path(option_id): Path<Uuid>,
) -> ApiResult<Value> {
    let business = approved_business(&user).await?;
    cobranding_service::deactivate_option(business.id, option_id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
pub struct EnabledInput {
    pub enabled: bool,
}

/// PUT /api/cobranding/enabled - opt in or out of the program.
pub async fn set_enabled(
    Extension(user): Extension<AuthUser>,
    Json(input): Json<EnabledInput>,
) -> ApiResult<Value> {
    let business = approved_business(&user).await?;
    cobranding_service::set_enabled(business.id, input.enabled).await?;
    Ok(ApiResponse::success(json!({ "enabled": input.enabled })))
}

/// GET /api/cobranding/partners - businesses open to co-branding.
pub async fn partners(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Business>> {
    let business = approved_business(&user).await?;
    let partners = cobranding_service::partner_directory(business.id).await?;
    Ok(ApiResponse::success(partners))
}

/// GET /api/cobranding/partners/:business_id/options - a partner's
/// active options, for composing a proposal.
pub async fn partner_options(
    Extension(user): Extension<AuthUser>,
    Path(partner_id): Path<Uuid>,
) -> ApiResult<Vec<CoBrandingOption>> {
    approved_business(&user).await?;
    let options = cobranding_service::list_options(partner_id).await?;
    Ok(ApiResponse::success(options))
}

/// POST /api/cobranding/intents
pub async fn create_intent(
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateIntent>,
) -> ApiResult<CoBrandingIntent> {
    let business = approved_business(&user).await?;
    let intent = cobranding_service::create_intent(business.id, req).await?;
    Ok(ApiResponse::created(intent))
}

/// GET /api/cobranding/intents/inbox - pending proposals received.
pub async fn inbox(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<InboxEntry>> {
    let business = approved_business(&user).await?;
    let entries = cobranding_service::inbox(business.id).await?;
    Ok(ApiResponse::success(entries))
}

#[derive(Debug, Deserialize)]
pub struct IntentDecision {
    pub decision: Decision,
}

/// PUT /api/cobranding/intents/:id - accept or reject a proposal.
pub async fn decide_intent(
    Extension(user): Extension<AuthUser>,
    Path(intent_id): Path<Uuid>,
    Json(input): Json<IntentDecision>,
) -> ApiResult<DecisionOutcome> {
    let business = approved_business(&user).await?;
    let outcome = cobranding_service::decide_intent(business.id, intent_id, input.decision).await?;
    Ok(ApiResponse::success(outcome))
}

/// GET /api/cobranding/agreements
pub async fn agreements(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<AgreementView>> {
    let business = approved_business(&user).await?;
    let agreements = cobranding_service::agreements_for(business.id).await?;
    Ok(ApiResponse::success(agreements))
}

/// POST /api/cobranding/agreements/:id/proofs
pub async fn submit_proof(
    Extension(user): Extension<AuthUser>,
    Path(agreement_id): Path<Uuid>,
    Json(form): Json<ProofForm>,
) -> ApiResult<CoBrandingProof> {
    let business = approved_business(&user).await?;
    let proof = cobranding_service::submit_proof(business.id, agreement_id, form).await?;
    Ok(ApiResponse::created(proof))
}
