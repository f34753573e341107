use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::database::models::EmergencyControls;
use crate::services::flag_service;

/// Outcome of the emergency-controls gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Maintenance,
}

/// Request-time gate evaluated before any route-specific logic.
///
/// kill_all_traffic sends everything except the admin surface and the
/// maintenance page to /maintenance. kill_auth_system blocks only the
/// auth/onboarding routes, leaving logout reachable. Admin routes are
/// always exempt so operators can self-heal.
pub async fn emergency_gate_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    // Fail open if the controls row is missing or the store is down;
    // an unreachable switch must not lock operators out.
    let controls = flag_service::emergency_controls()
        .await
        .unwrap_or_default();

    match evaluate_gate(&path, &controls) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Maintenance => Redirect::temporary("/maintenance").into_response(),
    }
}

pub fn evaluate_gate(path: &str, controls: &EmergencyControls) -> GateDecision {
    // Static assets and anything with a file extension pass through.
    if has_file_extension(path) {
        return GateDecision::Allow;
    }

    if is_exempt_path(path) {
        return GateDecision::Allow;
    }

    if controls.kill_all_traffic {
        return GateDecision::Maintenance;
    }

    if controls.kill_auth_system && is_auth_path(path) && !is_logout_path(path) {
        return GateDecision::Maintenance;
    }

    GateDecision::Allow
}

fn has_file_extension(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|seg| seg.contains('.'))
}

fn is_exempt_path(path: &str) -> bool {
    path == "/maintenance"
        || path == "/health"
        || path == "/admin"
        || path.starts_with("/admin/")
        || path == "/api/admin"
        || path.starts_with("/api/admin/")
}

fn is_auth_path(path: &str) -> bool {
    path.starts_with("/auth/") || path == "/onboarding" || path.starts_with("/onboarding/")
}

fn is_logout_path(path: &str) -> bool {
    path == "/auth/logout"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(kill_all: bool, kill_auth: bool) -> EmergencyControls {
        EmergencyControls {
            id: 1,
            kill_all_traffic: kill_all,
            kill_auth_system: kill_auth,
        }
    }

    #[test]
    fn quiet_controls_allow_everything() {
        let c = controls(false, false);
        assert_eq!(evaluate_gate("/dashboard/business", &c), GateDecision::Allow);
        assert_eq!(evaluate_gate("/auth/login", &c), GateDecision::Allow);
        assert_eq!(evaluate_gate("/", &c), GateDecision::Allow);
    }

    #[test]
    fn kill_all_traffic_redirects_non_exempt_paths() {
        let c = controls(true, false);
        assert_eq!(
            evaluate_gate("/dashboard/business", &c),
            GateDecision::Maintenance
        );
        assert_eq!(evaluate_gate("/", &c), GateDecision::Maintenance);
        assert_eq!(evaluate_gate("/api/assets", &c), GateDecision::Maintenance);
        assert_eq!(evaluate_gate("/auth/login", &c), GateDecision::Maintenance);
    }

    #[test]
    fn admin_and_maintenance_are_always_exempt() {
        let c = controls(true, true);
        assert_eq!(evaluate_gate("/admin", &c), GateDecision::Allow);
        assert_eq!(evaluate_gate("/admin/verification", &c), GateDecision::Allow);
        assert_eq!(evaluate_gate("/api/admin/flags", &c), GateDecision::Allow);
        assert_eq!(evaluate_gate("/maintenance", &c), GateDecision::Allow);
        assert_eq!(evaluate_gate("/health", &c), GateDecision::Allow);
    }

    #[test]
    fn kill_auth_blocks_auth_routes_except_logout() {
        let c = controls(false, true);
        assert_eq!(evaluate_gate("/auth/login", &c), GateDecision::Maintenance);
        assert_eq!(evaluate_gate("/auth/register", &c), GateDecision::Maintenance);
        assert_eq!(evaluate_gate("/auth/callback", &c), GateDecision::Maintenance);
        assert_eq!(
            evaluate_gate("/onboarding/role-selection", &c),
            GateDecision::Maintenance
        );
        assert_eq!(evaluate_gate("/auth/logout", &c), GateDecision::Allow);
        // non-auth traffic unaffected
        assert_eq!(evaluate_gate("/api/assets", &c), GateDecision::Allow);
    }

    #[test]
    fn file_extensions_pass_through() {
        let c = controls(true, true);
        assert_eq!(evaluate_gate("/favicon.ico", &c), GateDecision::Allow);
        assert_eq!(evaluate_gate("/static/app.js", &c), GateDecision::Allow);
    }
}
