pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{admin, protected, public};
use middleware::auth::jwt_auth_middleware;
use middleware::gate::emergency_gate_middleware;

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Authenticated API
        .merge(protected_routes())
        .merge(admin_routes())
        // Emergency controls run before everything else
        .layer(from_fn(emergency_gate_middleware))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use public::{auth, ops, site};

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/sitemap.xml", get(site::sitemap))
        .route("/pages/:slug", get(site::page))
        .route("/legal/:doc_type", get(site::legal))
        .route("/maintenance", get(site::maintenance))
        .route("/api/revalidate", post(ops::revalidate))
        .route("/api/send-alert", post(ops::send_alert))
}

fn protected_routes() -> Router {
    use protected::{cobranding, discover, marketplace, onboarding, session};

    Router::new()
        // Session
        .route("/api/auth/whoami", get(session::whoami))
        // Onboarding
        .route("/api/onboarding/role", post(session::select_role))
        .route(
            "/api/onboarding/business",
            get(onboarding::get_business).put(onboarding::put_business),
        )
        .route(
            "/api/onboarding/creator",
            get(onboarding::get_creator).put(onboarding::put_creator),
        )
        // Co-branding
        .route(
            "/api/cobranding/options",
            get(cobranding::list_options).post(cobranding::create_option),
        )
        .route("/api/cobranding/options/:id", delete(cobranding::delete_option))
        .route("/api/cobranding/enabled", put(cobranding::set_enabled))
        .route("/api/cobranding/partners", get(cobranding::partners))
        .route(
            "/api/cobranding/partners/:business_id/options",
            get(cobranding::partner_options),
        )
        .route("/api/cobranding/intents", post(cobranding::create_intent))
        .route("/api/cobranding/intents/inbox", get(cobranding::inbox))
        .route("/api/cobranding/intents/:id", put(cobranding::decide_intent))
        .route("/api/cobranding/agreements", get(cobranding::agreements))
        .route(
            "/api/cobranding/agreements/:id/proofs",
            post(cobranding::submit_proof),
        )
        // Discovery
        .route("/api/discover", get(discover::matches))
        .route(
            "/api/discover/saved/:creator_id",
            put(discover::save).delete(discover::unsave),
        )
        // Marketplace
        .route("/api/marketplace/assets", get(marketplace::assets))
        .route("/api/marketplace/assets/:id", get(marketplace::asset))
        .route(
            "/api/marketplace/bookings",
            get(marketplace::bookings).post(marketplace::create_booking),
        )
        // Feature availability
        .route("/api/flags/:key/check", get(marketplace::check_flag))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn admin_routes() -> Router {
    use admin::{cms, flags, site, users, verification};

    Router::new()
        // Verification console
        .route("/api/admin/verification", get(verification::queues))
        .route("/api/admin/verification/:kind/:id", put(verification::decide))
        .route("/api/admin/proofs", get(verification::pending_proofs))
        .route("/api/admin/proofs/:id", put(verification::decide_proof))
        // Users & moderation
        .route("/api/admin/users", get(users::list))
        .route("/api/admin/users/:id/ban", post(users::ban))
        .route("/api/admin/users/:id/unban", post(users::unban))
        .route("/api/admin/users/:id/approve", post(users::approve))
        .route("/api/admin/users/:id/promote", post(users::promote))
        .route("/api/admin/audit", get(users::audit_log))
        // Feature flags & kill switches
        .route("/api/admin/flags", get(flags::list).post(flags::create))
        .route(
            "/api/admin/flags/:id",
            put(flags::toggle).delete(flags::delete),
        )
        .route(
            "/api/admin/emergency",
            get(flags::emergency).put(flags::set_emergency),
        )
        // CMS
        .route(
            "/api/admin/cms/pages",
            get(cms::list_pages).post(cms::create_page),
        )
        .route(
            "/api/admin/cms/pages/:id",
            get(cms::page_editor).put(cms::save_page),
        )
        .route(
            "/api/admin/cms/pages/:id/versions/:version_id",
            get(cms::restore_payload),
        )
        .route("/api/admin/cms/pages/:id/preview", post(cms::mint_preview))
        // Site settings, navigation, legal
        .route(
            "/api/admin/settings",
            get(site::settings).put(site::save_settings),
        )
        .route(
            "/api/admin/navigation",
            get(site::navigation).put(site::save_navigation),
        )
        .route(
            "/api/admin/footer",
            get(site::footer_links).put(site::save_footer_links),
        )
        .route("/api/admin/legal", get(site::legal).post(site::publish_legal))
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "AdMarket API",
            "version": version,
            "description": "Advertising marketplace backend - onboarding, co-branding deals, bookings and CMS back office",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login, /auth/logout (public)",
                "site": "/pages/:slug, /legal/:doc_type, /sitemap.xml (public)",
                "ops": "/api/revalidate, /api/send-alert (shared secret / fixed template)",
                "session": "/api/auth/whoami (protected)",
                "onboarding": "/api/onboarding/* (protected)",
                "cobranding": "/api/cobranding/* (protected, approved businesses)",
                "discover": "/api/discover (protected, businesses)",
                "marketplace": "/api/marketplace/* (protected)",
                "admin": "/api/admin/* (ADMIN or SUPER_ADMIN)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
