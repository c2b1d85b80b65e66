//! Dashboard route: aggregates recomputed from the caller's logs on every request.

use axum::extract::State;
use axum::response::Json;
use time::OffsetDateTime;

use super::ApiError;
use super::auth::AuthUser;
use super::logs::work_log_error_response;
use crate::services::work_log;
use crate::state::AppState;
use crate::stats::{DashboardStats, compute_stats};

/// `GET /api/dashboard`
pub async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> Result<Json<DashboardStats>, ApiError> {
    let logs = work_log::list_logs(&state.pool, auth.user.id)
        .await
        .map_err(work_log_error_response)?;
    Ok(Json(compute_stats(&logs, OffsetDateTime::now_utc())))
}
