//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the JSON API, the login-link callback and the health probe under a
//! single Axum router. Every `/api` route except the login-link request is
//! guarded by the `AuthUser` extractor.

pub mod auth;
pub mod dashboard;
pub mod logs;
pub mod summary;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Error response carrying a `{ "error": message }` body.
pub(crate) type ApiError = (StatusCode, Json<serde_json::Value>);

pub(crate) fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.to_string() })))
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/callback", get(auth::login_callback))
        .route("/api/auth/login-link", post(auth::request_login_link))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/logs", get(logs::list_logs).post(logs::create_log))
        .route(
            "/api/logs/{id}",
            get(logs::get_log)
                .patch(logs::update_log)
                .delete(logs::delete_log),
        )
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/api/summary", get(summary::summary))
        .route("/api/summary.pdf", get(summary::summary_pdf))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
