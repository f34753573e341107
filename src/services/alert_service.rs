use serde::Deserialize;
use serde_json::json;

use crate::config;

#[derive(Debug, Deserialize)]
pub struct AlertRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert webhook not configured")]
    NotConfigured,

    #[error("alert webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("alert webhook returned {0}")]
    UpstreamStatus(reqwest::StatusCode),
}

/// Relay a fixed-template verification notification to the operator
/// mailbox via the configured webhook.
pub async fn send_alert(alert: &AlertRequest) -> Result<(), AlertError> {
    let cfg = &config::config().alerts;

    if cfg.webhook_url.is_empty() {
        return Err(AlertError::NotConfigured);
    }

    let payload = json!({
        "to": cfg.operator_email,
        "subject": format!("ACTION REQUIRED: New {} Verification", alert.kind),
        "body": format!(
            "New verification request\nType: {}\nName: {}\nApplicant Email: {}\n\nOpen the console to approve: {}/admin/verification",
            alert.kind, alert.name, alert.email,
            config::config().site.base_url
        ),
    });

    let client = reqwest::Client::new();
    let response = client
        .post(&cfg.webhook_url)
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AlertError::UpstreamStatus(response.status()));
    }

    Ok(())
}

/// Best-effort variant used by onboarding submissions: failures are
/// logged at warn and never block the caller's request.
pub fn send_alert_background(kind: &str, name: &str, email: &str) {
    let alert = AlertRequest {
        kind: kind.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    };

    tokio::spawn(async move {
        if let Err(e) = send_alert(&alert).await {
            tracing::warn!(kind = %alert.kind, "operator alert failed: {}", e);
        }
    });
}
