mod config;
mod db;
mod llm;
mod model;
mod pdf;
mod rate_limit;
mod routes;
mod services;
mod state;
mod stats;
mod summary;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    match services::session::purge_expired(&pool).await {
        Ok(removed) => tracing::info!(removed, "purged expired sessions and login links"),
        Err(e) => tracing::warn!(error = %e, "session purge failed"),
    }

    // Initialize LLM client (non-fatal: summaries fall back to templates).
    let llm: Option<Arc<dyn llm::LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::info!(error = %e, "LLM client not configured; using summary templates");
            None
        }
    };

    if config.email.is_none() {
        tracing::warn!("RESEND_API_KEY/RESEND_FROM not set; login links will be logged instead of emailed");
    }

    let rate_limiter = rate_limit::RateLimiter::new(rate_limit::RateLimitConfig::from_env());
    let state = state::AppState::new(pool, config, llm, rate_limiter);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "worklog listening");
    axum::serve(listener, app).await.expect("server failed");
}
