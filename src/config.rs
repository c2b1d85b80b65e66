//! Process configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) and then builds one `AppConfig`. Every
//! other module receives the values it needs through `AppState` instead of
//! reading the environment on its own, with the exception of the LLM and
//! rate-limit settings, which keep their own `from_env` constructors.

use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
const DEFAULT_LOGIN_LINK_TTL_MINUTES: i64 = 15;
const MAX_SESSION_TTL_DAYS: i64 = 365;
const MAX_LOGIN_LINK_TTL_MINUTES: i64 = 24 * 60;
const DEFAULT_APP_URL: &str = "/";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Outbound email settings. Absent in development, where login links are logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub resend_api_key: String,
    pub resend_from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Where the browser lands after a successful login-link callback.
    pub app_url: String,
    /// Externally reachable origin used to build login links.
    pub public_base_url: String,
    pub cookie_secure: bool,
    pub session_ttl: Duration,
    pub login_link_ttl: Duration,
    pub email: Option<EmailConfig>,
}

impl AppConfig {
    /// Build the config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or `PORT` does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (tests pass a map).
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let cookie_secure = lookup("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or_else(|| public_base_url.starts_with("https://"));

        let email = match (lookup("RESEND_API_KEY"), lookup("RESEND_FROM")) {
            (Some(resend_api_key), Some(resend_from)) if !resend_api_key.trim().is_empty() => {
                Some(EmailConfig { resend_api_key, resend_from })
            }
            _ => None,
        };

        let session_days = parse_or(&lookup, "SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS).clamp(1, MAX_SESSION_TTL_DAYS);
        let link_minutes = parse_or(&lookup, "LOGIN_LINK_TTL_MINUTES", DEFAULT_LOGIN_LINK_TTL_MINUTES)
            .clamp(1, MAX_LOGIN_LINK_TTL_MINUTES);

        Ok(Self {
            database_url,
            port,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            app_url: lookup("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_owned()),
            public_base_url,
            cookie_secure,
            session_ttl: Duration::from_secs(days_to_secs(session_days)),
            login_link_ttl: Duration::from_secs(minutes_to_secs(link_minutes)),
            email,
        })
    }

    /// Absolute URL a login-link email points at.
    #[must_use]
    pub fn login_link_url(&self, token: &str) -> String {
        format!("{}/auth/callback?token={token}", self.public_base_url)
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    parse_or(&|k: &str| std::env::var(k).ok(), key, default)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[allow(clippy::cast_sign_loss)]
fn days_to_secs(days: i64) -> u64 {
    (days.max(0) as u64).saturating_mul(24 * 60 * 60)
}

#[allow(clippy::cast_sign_loss)]
fn minutes_to_secs(minutes: i64) -> u64 {
    (minutes.max(0) as u64).saturating_mul(60)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
