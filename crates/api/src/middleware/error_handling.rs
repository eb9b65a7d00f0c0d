//! # Error Handling Middleware
//!
//! Maps timetable errors to HTTP status codes and JSON error bodies so every
//! endpoint reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use timetable_core::errors::TimetableError;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps `TimetableError` and implements `IntoResponse`, so
/// handlers can return `Result<_, AppError>` and use `?` on core results.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use timetable_api::middleware::error_handling::AppError;
/// use timetable_core::errors::TimetableError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(TimetableError::NotFound("Timetable not found".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TimetableError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TimetableError::NotFound(_) => StatusCode::NOT_FOUND,
            TimetableError::Validation(_) => StatusCode::BAD_REQUEST,
            TimetableError::Conflict(_) => StatusCode::CONFLICT,
            TimetableError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Lets handlers use `?` on functions returning `TimetableResult<T>`.
impl From<TimetableError> for AppError {
    fn from(err: TimetableError) -> Self {
        AppError(err)
    }
}

/// Wraps unexpected `eyre` failures as internal errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TimetableError::Internal(err.into()))
    }
}

/// Maps a TimetableError straight to an HTTP response
pub fn map_error(err: TimetableError) -> Response {
    AppError(err).into_response()
}
