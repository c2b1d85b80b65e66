//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Work logs and sessions live in Postgres, so the only in-process mutable
//! state is the login-link rate limiter.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::llm::LlmChat;
use crate::rate_limit::RateLimiter;

/// Shared application state. Clone is required by Axum; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    /// Throttles login-link requests.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: AppConfig, llm: Option<Arc<dyn LlmChat>>, rate_limiter: RateLimiter) -> Self {
        Self { pool, config: Arc::new(config), llm, rate_limiter }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
