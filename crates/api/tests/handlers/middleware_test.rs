use axum::http::StatusCode;
use rstest::rstest;
use timetable_api::middleware::error_handling::{map_error, AppError};
use timetable_core::errors::TimetableError;

#[rstest]
#[case(TimetableError::NotFound("Timetable not found".to_string()), StatusCode::NOT_FOUND)]
#[case(TimetableError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(TimetableError::Conflict("Cell is not empty".to_string()), StatusCode::CONFLICT)]
#[case(
    TimetableError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: TimetableError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(TimetableError::Conflict("Cell monday 08:00-09:00 is not empty".to_string()));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Conflict: Cell monday 08:00-09:00 is not empty");
}

#[test]
fn test_eyre_report_becomes_internal() {
    let error = AppError::from(eyre::eyre!("lock poisoned"));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_core_error_conversion() {
    let error: AppError = TimetableError::Validation("Timetable is read-only".to_string()).into();
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}
