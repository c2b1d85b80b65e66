//! Work log routes: owner-scoped CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use super::auth::AuthUser;
use super::{ApiError, api_error};
use crate::model::{NewWorkLog, WorkLog, WorkLogPatch};
use crate::services::work_log::{self, WorkLogError};
use crate::state::AppState;

pub(crate) fn work_log_error_to_status(err: &WorkLogError) -> StatusCode {
    match err {
        WorkLogError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkLogError::Invalid(_) => StatusCode::BAD_REQUEST,
        WorkLogError::Corrupt { .. } | WorkLogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a service error to a JSON error response, logging server-side failures.
pub(crate) fn work_log_error_response(err: WorkLogError) -> ApiError {
    let status = work_log_error_to_status(&err);
    match err {
        WorkLogError::NotFound(_) => api_error(status, "Log not found"),
        WorkLogError::Invalid(e) => api_error(status, e),
        e @ (WorkLogError::Corrupt { .. } | WorkLogError::Database(_)) => {
            tracing::error!(error = %e, "work log query failed");
            api_error(status, "Internal error")
        }
    }
}

/// `GET /api/logs`: all of the caller's logs, newest first.
pub async fn list_logs(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<WorkLog>>, ApiError> {
    let logs = work_log::list_logs(&state.pool, auth.user.id)
        .await
        .map_err(work_log_error_response)?;
    Ok(Json(logs))
}

/// `POST /api/logs`: create a log.
pub async fn create_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<NewWorkLog>,
) -> Result<(StatusCode, Json<WorkLog>), ApiError> {
    let log = work_log::create_log(&state.pool, auth.user.id, body)
        .await
        .map_err(work_log_error_response)?;
    tracing::info!(user_id = %auth.user.id, log_id = %log.id, impact = log.impact_type.as_str(), "work log created");
    Ok((StatusCode::CREATED, Json(log)))
}

/// `GET /api/logs/{id}`
pub async fn get_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkLog>, ApiError> {
    let log = work_log::get_log(&state.pool, auth.user.id, id)
        .await
        .map_err(work_log_error_response)?;
    Ok(Json(log))
}

/// `PATCH /api/logs/{id}`: partial update.
pub async fn update_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<WorkLogPatch>,
) -> Result<Json<WorkLog>, ApiError> {
    let log = work_log::update_log(&state.pool, auth.user.id, id, body)
        .await
        .map_err(work_log_error_response)?;
    Ok(Json(log))
}

/// `DELETE /api/logs/{id}`
pub async fn delete_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    work_log::delete_log(&state.pool, auth.user.id, id)
        .await
        .map_err(work_log_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "logs_test.rs"]
mod tests;
