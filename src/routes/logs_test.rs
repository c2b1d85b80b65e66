use crate::model::ValidationError;

use super::*;

#[test]
fn work_log_errors_map_to_statuses() {
    assert_eq!(work_log_error_to_status(&WorkLogError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(
        work_log_error_to_status(&WorkLogError::Invalid(ValidationError::EmptyTitle)),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        work_log_error_to_status(&WorkLogError::Corrupt { field: "impact_type", value: "x".into() }),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        work_log_error_to_status(&WorkLogError::Database(sqlx::Error::RowNotFound)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn not_found_body_does_not_echo_the_id() {
    let (status, Json(body)) = work_log_error_response(WorkLogError::NotFound(Uuid::new_v4()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Log not found");
}

#[test]
fn validation_body_carries_the_message() {
    let (status, Json(body)) = work_log_error_response(WorkLogError::Invalid(ValidationError::EmptyTitle));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");
}

#[test]
fn database_errors_are_not_leaked() {
    let (status, Json(body)) = work_log_error_response(WorkLogError::Database(sqlx::Error::PoolTimedOut));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal error");
}
