//! Auth routes: login-link request and callback, session introspection.

use axum::extract::{FromRef, Query, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use super::{ApiError, api_error};
use crate::services::login_link::{self, LoginLinkError};
use crate::services::session;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

fn session_cookie(value: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

pub(crate) fn login_link_error_to_status(err: &LoginLinkError) -> StatusCode {
    match err {
        LoginLinkError::InvalidEmail => StatusCode::BAD_REQUEST,
        LoginLinkError::VerificationFailed => StatusCode::UNAUTHORIZED,
        LoginLinkError::EmailDelivery(_) => StatusCode::BAD_GATEWAY,
        LoginLinkError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved from the session cookie or a bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

pub(crate) fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Tokens to try, in order: an explicit bearer header first, then the cookie.
pub(crate) fn candidate_tokens(headers: &axum::http::HeaderMap) -> Vec<String> {
    let jar = CookieJar::from_headers(headers);
    let mut tokens: Vec<String> = bearer_token(headers).map(str::to_owned).into_iter().collect();
    if let Some(cookie) = jar.get(COOKIE_NAME).map(Cookie::value).filter(|t| !t.is_empty()) {
        if !tokens.iter().any(|t| t == cookie) {
            tokens.push(cookie.to_owned());
        }
    }
    tokens
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = candidate_tokens(&parts.headers);
        if tokens.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        for token in tokens {
            let user = session::validate_session(&app_state.pool, &token)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "session lookup failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                })?;
            if let Some(user) = user {
                return Ok(Self { user, token });
            }
        }
        Err(StatusCode::UNAUTHORIZED)
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginLinkBody {
    email: String,
}

/// `POST /api/auth/login-link`: email a one-time sign-in link.
pub async fn request_login_link(
    State(state): State<AppState>,
    Json(body): Json<LoginLinkBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let email = login_link::normalize_email(&body.email)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, LoginLinkError::InvalidEmail))?;

    state.rate_limiter.check_and_record(&email).map_err(|e| {
        tracing::warn!(%email, error = %e, "login link throttled");
        api_error(StatusCode::TOO_MANY_REQUESTS, e)
    })?;

    let token = login_link::request_login_link(&state.pool, &email, state.config.login_link_ttl)
        .await
        .map_err(|e| {
            tracing::error!(%email, error = %e, "login link creation failed");
            api_error(login_link_error_to_status(&e), e)
        })?;
    let link = state.config.login_link_url(&token);

    match &state.config.email {
        Some(cfg) => {
            login_link::send_login_link_email(&cfg.resend_api_key, &cfg.resend_from, &email, &link)
                .await
                .map_err(|e| {
                    tracing::error!(%email, error = %e, "login link delivery failed");
                    api_error(login_link_error_to_status(&e), e)
                })?;
            tracing::info!(%email, "login link sent");
        }
        None => tracing::info!(%email, %link, "email delivery not configured; login link"),
    }

    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "ok": true }))))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    token: String,
}

/// `GET /auth/callback?token=`: redeem a login link, set the session cookie, redirect.
pub async fn login_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let user_id = match login_link::consume_login_link(&state.pool, &params.token).await {
        Ok(id) => id,
        Err(e) => {
            let status = login_link_error_to_status(&e);
            if status.is_server_error() {
                tracing::error!(error = %e, "login link redemption failed");
            }
            return api_error(status, e).into_response();
        }
    };

    let token = match session::create_session(&state.pool, user_id, state.config.session_ttl).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, %user_id, "session creation failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session").into_response();
        }
    };

    let max_age = Duration::try_from(state.config.session_ttl).unwrap_or(Duration::days(30));
    let jar = jar.add(session_cookie(token, state.config.cookie_secure, max_age));
    tracing::info!(%user_id, "signed in via login link");
    (jar, Redirect::to(&state.config.app_url)).into_response()
}

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, user_id = %auth.user.id, "session delete failed");
    }

    let jar = CookieJar::new().add(session_cookie(String::new(), state.config.cookie_secure, Duration::ZERO));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
