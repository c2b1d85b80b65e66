//! In-memory rate limiting for login-link requests.
//!
//! DESIGN
//! ======
//! Sliding-window counters backed by `HashMap<String, VecDeque<Instant>>`.
//! Two limits are enforced before a link is issued:
//! - Per-email: 5 requests per 10 minutes
//! - Global: 60 requests per minute
//!
//! Both are tunable through `RATE_LIMIT_*` environment variables. State is
//! process-local, so limits reset on restart.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::env_parse;

const DEFAULT_PER_EMAIL_LIMIT: usize = 5;
const DEFAULT_PER_EMAIL_WINDOW_SECS: u64 = 600;

const DEFAULT_GLOBAL_LIMIT: usize = 60;
const DEFAULT_GLOBAL_WINDOW_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_email_limit: usize,
    pub per_email_window: Duration,
    pub global_limit: usize,
    pub global_window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_email_limit: DEFAULT_PER_EMAIL_LIMIT,
            per_email_window: Duration::from_secs(DEFAULT_PER_EMAIL_WINDOW_SECS),
            global_limit: DEFAULT_GLOBAL_LIMIT,
            global_window: Duration::from_secs(DEFAULT_GLOBAL_WINDOW_SECS),
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            per_email_limit: env_parse("RATE_LIMIT_PER_EMAIL", DEFAULT_PER_EMAIL_LIMIT),
            per_email_window: Duration::from_secs(env_parse(
                "RATE_LIMIT_PER_EMAIL_WINDOW_SECS",
                DEFAULT_PER_EMAIL_WINDOW_SECS,
            )),
            global_limit: env_parse("RATE_LIMIT_GLOBAL", DEFAULT_GLOBAL_LIMIT),
            global_window: Duration::from_secs(env_parse("RATE_LIMIT_GLOBAL_WINDOW_SECS", DEFAULT_GLOBAL_WINDOW_SECS)),
        }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum RateLimitError {
    #[error("too many sign-in requests for this email (max {limit}/{window_secs}s)")]
    PerEmailExceeded { limit: usize, window_secs: u64 },
    #[error("too many sign-in requests (max {limit}/{window_secs}s)")]
    GlobalExceeded { limit: usize, window_secs: u64 },
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
    config: RateLimitConfig,
}

#[derive(Default)]
struct RateLimiterInner {
    per_email: HashMap<String, VecDeque<Instant>>,
    global: VecDeque<Instant>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self { inner: Arc::new(Mutex::new(RateLimiterInner::default())), config }
    }

    /// Check both limits for `email`, then record the request.
    pub fn check_and_record(&self, email: &str) -> Result<(), RateLimitError> {
        self.check_and_record_at(email, Instant::now())
    }

    fn check_and_record_at(&self, email: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let cfg = self.config;

        prune_window(&mut inner.global, now, cfg.global_window);
        if inner.global.len() >= cfg.global_limit {
            return Err(RateLimitError::GlobalExceeded {
                limit: cfg.global_limit,
                window_secs: cfg.global_window.as_secs(),
            });
        }

        let deque = inner.per_email.entry(email.to_owned()).or_default();
        prune_window(deque, now, cfg.per_email_window);
        if deque.len() >= cfg.per_email_limit {
            return Err(RateLimitError::PerEmailExceeded {
                limit: cfg.per_email_limit,
                window_secs: cfg.per_email_window.as_secs(),
            });
        }

        deque.push_back(now);
        inner.global.push_back(now);
        // Drop idle keys.
        inner.per_email.retain(|_, d| {
            prune_window(d, now, cfg.per_email_window);
            !d.is_empty()
        });
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) > window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
