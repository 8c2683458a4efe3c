use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{IdentityService, RemoteIdentityService};
use crate::chat::{ChatCompletion, RemoteChatClient};
use crate::config::AppConfig;
use crate::handlers;
use crate::mail::{Mailer, ResendMailer};
use crate::middleware::{rate_limit_middleware, require_auth, require_credential, NoopLimiter, RateLimiter, SlidingWindowLimiter};
use crate::payments::{PaymentsApi, PaymentsClient};
use crate::zerodb::{KnowledgeStore, TableStore, ZeroDbClient};

/// Everything a handler needs, passed explicitly. Each remote dependency sits
/// behind a trait so tests can substitute recording fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub limiter: Arc<dyn RateLimiter>,
    pub identity: Arc<dyn IdentityService>,
    pub tables: Arc<dyn TableStore>,
    pub knowledge: Arc<dyn KnowledgeStore>,
    pub mailer: Arc<dyn Mailer>,
    pub completion: Arc<dyn ChatCompletion>,
    pub payments: Arc<dyn PaymentsApi>,
}

impl AppState {
    /// Wires the production clients from configuration
    pub fn from_config(config: AppConfig) -> Self {
        let limiter: Arc<dyn RateLimiter> = if config.api.enable_rate_limiting {
            Arc::new(SlidingWindowLimiter::new(
                config.api.rate_limit_requests,
                config.rate_limit_window(),
            ))
        } else {
            Arc::new(NoopLimiter)
        };

        let zerodb = Arc::new(ZeroDbClient::new(config.zerodb.clone()));

        Self {
            limiter,
            identity: Arc::new(RemoteIdentityService::new(&config.auth)),
            tables: zerodb.clone(),
            knowledge: zerodb,
            mailer: Arc::new(ResendMailer::new(&config.mail)),
            completion: Arc::new(RemoteChatClient::new(&config.chat)),
            payments: Arc::new(PaymentsClient::new(&config.payments)),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/contact", post(handlers::public::contact::submit))
        .route(
            "/api/chat",
            get(handlers::public::chat::history).post(handlers::public::chat::send),
        )
        .merge(session_routes(&state))
        // Protected
        .merge(admin_routes(&state))
        .merge(wallet_routes(&state))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_routes(state: &AppState) -> Router<AppState> {
    use handlers::public::auth;

    let login = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route_layer(from_fn_with_state(state.clone(), rate_limit_middleware));

    let verify = Router::new()
        .route("/api/auth/verify", get(auth::verify))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .merge(login)
        .merge(verify)
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::admin::{case_studies, chat_logs, contacts};

    // Layers run bottom-up: the rate limit rejects before auth does any work
    Router::new()
        .route(
            "/api/admin/case-studies",
            get(case_studies::list).post(case_studies::create),
        )
        .route("/api/admin/chat-logs", get(chat_logs::list).post(chat_logs::create))
        .route("/api/admin/contacts", get(contacts::list).post(contacts::create))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .route_layer(from_fn_with_state(state.clone(), rate_limit_middleware))
}

fn wallet_routes(state: &AppState) -> Router<AppState> {
    use handlers::wallet;

    Router::new()
        .route("/api/wallet", get(wallet::show).post(wallet::create))
        .route("/api/wallet/transactions", get(wallet::transactions))
        .route("/api/wallet/withdraw", post(wallet::withdraw))
        .route("/api/wallet/deposit", post(wallet::deposit))
        .route_layer(from_fn_with_state(state.clone(), require_credential))
        .route_layer(from_fn_with_state(state.clone(), rate_limit_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Agency API",
            "version": version,
            "description": "Admin and lead-capture backend backed by ZeroDB",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "contact": "POST /api/contact (public)",
                "chat": "GET/POST /api/chat (public, session cookie)",
                "auth": "/api/auth/login, /api/auth/logout, /api/auth/verify",
                "admin": "/api/admin/case-studies, /api/admin/chat-logs, /api/admin/contacts (protected)",
                "wallet": "/api/wallet[/transactions|/withdraw|/deposit] (protected)",
            }
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
