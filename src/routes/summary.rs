//! Summary routes: JSON report and PDF export.
//!
//! Both endpoints run the same pipeline: load the caller's logs for the
//! period (oldest first), generate one bullet per log, then reframe the
//! bullets for the requested mode.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::auth::AuthUser;
use super::logs::work_log_error_response;
use super::{ApiError, api_error};
use crate::pdf::{self, SummaryDocument};
use crate::services::ai::{self, SummarySource};
use crate::services::work_log;
use crate::state::AppState;
use crate::summary::{self, Mode, Period};

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<u32>,
    pub mode: Option<Mode>,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub period_days: u32,
    pub period_label: &'static str,
    pub mode: Mode,
    pub bullets: Vec<String>,
    /// Copy-ready text for the selected mode.
    pub text: String,
    pub log_count: usize,
    pub source: SummarySource,
}

pub(crate) fn resolve_period(days: Option<u32>) -> Result<Period, ApiError> {
    match days {
        None => Ok(Period::default()),
        Some(d) => Period::from_days(d)
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "period must be one of 30, 90 or 180 days")),
    }
}

async fn build_report(state: &AppState, auth: &AuthUser, query: SummaryQuery) -> Result<SummaryReport, ApiError> {
    let period = resolve_period(query.period)?;
    let mode = query.mode.unwrap_or_default();

    let since = OffsetDateTime::now_utc() - Duration::days(i64::from(period.days()));
    let logs = work_log::list_logs_since(&state.pool, auth.user.id, since)
        .await
        .map_err(work_log_error_response)?;
    if logs.is_empty() {
        return Err(api_error(StatusCode::NOT_FOUND, summary::NO_LOGS_MESSAGE));
    }

    let generated = ai::generate_bullets(state.llm.as_deref(), &logs).await;
    let bullets = summary::format_by_mode(&summary::summary_text(&generated.bullets), mode);
    let text = summary::copy_text(&bullets, mode);

    tracing::info!(
        user_id = %auth.user.id,
        period_days = period.days(),
        ?mode,
        logs = logs.len(),
        source = ?generated.source,
        "summary generated"
    );

    Ok(SummaryReport {
        period_days: period.days(),
        period_label: period.label(),
        mode,
        bullets,
        text,
        log_count: logs.len(),
        source: generated.source,
    })
}

/// `GET /api/summary?period=&mode=`
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryReport>, ApiError> {
    build_report(&state, &auth, query).await.map(Json)
}

/// `GET /api/summary.pdf?period=&mode=`
pub async fn summary_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> Result<Response, ApiError> {
    let report = build_report(&state, &auth, query).await?;
    let bytes = pdf::render_summary_pdf(&SummaryDocument {
        title: pdf::DEFAULT_TITLE,
        period_days: report.period_days,
        bullets: &report.bullets,
        generated_on: OffsetDateTime::now_utc().date(),
    })
    .map_err(|e| {
        tracing::error!(user_id = %auth.user.id, error = %e, "summary pdf render failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_owned()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", pdf::FILE_NAME)),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
