//! Passwordless email sign-in.
//!
//! A login link carries a random token; only its SHA-256 hash is stored.
//! Requesting a new link invalidates older unconsumed links for the same
//! address, and consuming one is a single conditional UPDATE so a link can
//! never be redeemed twice.

use std::time::Duration;

use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::session::{bytes_to_hex, generate_token};

const LOGIN_LINK_TEMPLATE: &str = include_str!("../../templates/login_link.html");
const EMAIL_SUBJECT: &str = "Your Work Log sign-in link";

#[derive(Debug, thiserror::Error)]
pub enum LoginLinkError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid or expired login link")]
    VerificationFailed,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("email delivery failed: {0}")]
    EmailDelivery(String),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.trim().as_bytes());
    bytes_to_hex(&digest)
}

/// Issue a fresh login link for `email`, returning the raw token.
pub async fn request_login_link(pool: &PgPool, email: &str, ttl: Duration) -> Result<String, LoginLinkError> {
    let normalized = normalize_email(email).ok_or(LoginLinkError::InvalidEmail)?;

    sqlx::query("INSERT INTO users (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
        .bind(&normalized)
        .execute(pool)
        .await?;

    sqlx::query("DELETE FROM login_links WHERE email = $1 AND consumed_at IS NULL")
        .bind(&normalized)
        .execute(pool)
        .await?;

    let token = generate_token();
    sqlx::query(
        r"INSERT INTO login_links (email, token_hash, expires_at)
          VALUES ($1, $2, now() + make_interval(secs => $3))",
    )
    .bind(&normalized)
    .bind(hash_token(&token))
    .bind(ttl.as_secs_f64())
    .execute(pool)
    .await?;

    Ok(token)
}

/// Redeem a login link. Returns the signed-in user's id.
pub async fn consume_login_link(pool: &PgPool, token: &str) -> Result<Uuid, LoginLinkError> {
    if token.trim().is_empty() {
        return Err(LoginLinkError::VerificationFailed);
    }

    let row = sqlx::query(
        r"WITH link AS (
              UPDATE login_links
              SET consumed_at = now()
              WHERE id = (
                  SELECT id
                  FROM login_links
                  WHERE token_hash = $1
                    AND consumed_at IS NULL
                    AND expires_at > now()
                  ORDER BY created_at DESC
                  LIMIT 1
              )
              RETURNING email
          )
          SELECT u.id
          FROM link
          JOIN users u ON u.email = link.email",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    row.map(|r| r.get("id")).ok_or(LoginLinkError::VerificationFailed)
}

pub async fn send_login_link_email(
    resend_api_key: &str,
    resend_from: &str,
    to_email: &str,
    link: &str,
) -> Result<(), LoginLinkError> {
    let resend = Resend::new(resend_api_key);
    let html = render_login_link_template(to_email, link);

    let email = CreateEmailBaseOptions::new(resend_from, [to_email], EMAIL_SUBJECT).with_html(&html);
    resend
        .emails
        .send(email)
        .await
        .map_err(|e| LoginLinkError::EmailDelivery(e.to_string()))?;
    Ok(())
}

#[must_use]
pub fn render_login_link_template(email: &str, link: &str) -> String {
    LOGIN_LINK_TEMPLATE
        .replace("{{EMAIL}}", email)
        .replace("{{LINK}}", link)
}

#[cfg(test)]
#[path = "login_link_test.rs"]
mod tests;
