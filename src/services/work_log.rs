//! Work log service: owner-scoped CRUD over the `work_logs` table.
//!
//! DESIGN
//! ======
//! Every query filters on `user_id`, so a log owned by someone else is
//! indistinguishable from a missing one (`NotFound`). Listing order depends
//! on the caller: the log list and dashboard read newest first, summaries
//! read oldest first so bullets follow the order work happened.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::{EffortLevel, ImpactType, NewWorkLog, ValidationError, WorkLog, WorkLogPatch};

const LOG_COLUMNS: &str = "id, user_id, title, description, impact_type, effort_level, created_at";

#[derive(Debug, thiserror::Error)]
pub enum WorkLogError {
    #[error("work log not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("stored work log has unknown {field}: {value}")]
    Corrupt { field: &'static str, value: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn row_to_log(row: &PgRow) -> Result<WorkLog, WorkLogError> {
    let impact: String = row.try_get("impact_type")?;
    let effort: String = row.try_get("effort_level")?;
    let impact_type =
        ImpactType::parse(&impact).ok_or(WorkLogError::Corrupt { field: "impact_type", value: impact })?;
    let effort_level =
        EffortLevel::parse(&effort).ok_or(WorkLogError::Corrupt { field: "effort_level", value: effort })?;

    Ok(WorkLog {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        impact_type,
        effort_level,
        created_at: row.try_get("created_at")?,
    })
}

fn rows_to_logs(rows: &[PgRow]) -> Result<Vec<WorkLog>, WorkLogError> {
    rows.iter().map(row_to_log).collect()
}

// =============================================================================
// CRUD
// =============================================================================

/// Insert a new log for `user_id`.
///
/// # Errors
///
/// Returns `Invalid` if validation fails, or a database error.
pub async fn create_log(pool: &PgPool, user_id: Uuid, new: NewWorkLog) -> Result<WorkLog, WorkLogError> {
    let new = new.validate()?;
    let row = sqlx::query(&format!(
        "INSERT INTO work_logs (user_id, title, description, impact_type, effort_level)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {LOG_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.impact_type.as_str())
    .bind(new.effort_level.as_str())
    .fetch_one(pool)
    .await?;

    row_to_log(&row)
}

/// List all logs for `user_id`, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_logs(pool: &PgPool, user_id: Uuid) -> Result<Vec<WorkLog>, WorkLogError> {
    let rows = sqlx::query(&format!(
        "SELECT {LOG_COLUMNS} FROM work_logs WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows_to_logs(&rows)
}

/// List logs created at or after `since`, oldest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_logs_since(
    pool: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> Result<Vec<WorkLog>, WorkLogError> {
    let rows = sqlx::query(&format!(
        "SELECT {LOG_COLUMNS} FROM work_logs
         WHERE user_id = $1 AND created_at >= $2
         ORDER BY created_at ASC, id ASC"
    ))
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    rows_to_logs(&rows)
}

/// Fetch one log.
///
/// # Errors
///
/// Returns `NotFound` if the log does not exist or belongs to another user.
pub async fn get_log(pool: &PgPool, user_id: Uuid, log_id: Uuid) -> Result<WorkLog, WorkLogError> {
    let row = sqlx::query(&format!("SELECT {LOG_COLUMNS} FROM work_logs WHERE id = $1 AND user_id = $2"))
        .bind(log_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(WorkLogError::NotFound(log_id))?;

    row_to_log(&row)
}

/// Apply a partial update and return the stored row.
///
/// # Errors
///
/// Returns `Invalid` for a bad patch, `NotFound` for a missing/foreign log,
/// or a database error.
pub async fn update_log(
    pool: &PgPool,
    user_id: Uuid,
    log_id: Uuid,
    patch: WorkLogPatch,
) -> Result<WorkLog, WorkLogError> {
    let patch = patch.validate()?;
    if patch.is_empty() {
        return get_log(pool, user_id, log_id).await;
    }

    let row = sqlx::query(&format!(
        "UPDATE work_logs SET
             title = COALESCE($3, title),
             description = COALESCE($4, description),
             impact_type = COALESCE($5, impact_type),
             effort_level = COALESCE($6, effort_level)
         WHERE id = $1 AND user_id = $2
         RETURNING {LOG_COLUMNS}"
    ))
    .bind(log_id)
    .bind(user_id)
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.impact_type.map(ImpactType::as_str))
    .bind(patch.effort_level.map(EffortLevel::as_str))
    .fetch_optional(pool)
    .await?
    .ok_or(WorkLogError::NotFound(log_id))?;

    row_to_log(&row)
}

/// Delete one log.
///
/// # Errors
///
/// Returns `NotFound` if nothing was deleted.
pub async fn delete_log(pool: &PgPool, user_id: Uuid, log_id: Uuid) -> Result<(), WorkLogError> {
    let result = sqlx::query("DELETE FROM work_logs WHERE id = $1 AND user_id = $2")
        .bind(log_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(WorkLogError::NotFound(log_id));
    }
    tracing::info!(%user_id, %log_id, "work log deleted");
    Ok(())
}

#[cfg(test)]
#[path = "work_log_test.rs"]
mod tests;
