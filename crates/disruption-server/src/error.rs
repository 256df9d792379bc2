use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use disruption_core::error::DisruptionError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 404 Not Found errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 404 through
/// the `anyhow::Error` chain without touching the `DisruptionError` enum.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }
}

pub fn status_for(err: &DisruptionError) -> StatusCode {
    if err.is_run_level() {
        return StatusCode::UNPROCESSABLE_ENTITY;
    }
    match err {
        DisruptionError::JobNotCached(_) | DisruptionError::JobNotProcessed(_) => {
            StatusCode::NOT_FOUND
        }
        DisruptionError::UnknownJob(_) | DisruptionError::InvalidJobName(_) => {
            StatusCode::BAD_REQUEST
        }
        DisruptionError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let status = match self.0.downcast_ref::<DisruptionError>() {
            Some(e) => status_for(e),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn job_not_cached_maps_to_404() {
        let err = AppError(DisruptionError::JobNotCached("job".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn job_not_processed_maps_to_404() {
        let err = AppError(DisruptionError::JobNotProcessed("job".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_job_maps_to_400() {
        let err = AppError(DisruptionError::UnknownJob("job".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_job_name_maps_to_400() {
        let err = AppError(DisruptionError::InvalidJobName("..".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn corrupt_timing_maps_to_422() {
        let t = chrono::Utc::now();
        let err = AppError(
            DisruptionError::CorruptTiming {
                run: "orig/job/1".into(),
                started: t,
                finished: t,
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unreadable_entry_maps_to_422() {
        let err = AppError(
            DisruptionError::UnreadableEntry {
                dir: "orig/job".into(),
                name: std::ffi::OsString::from("run"),
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn cancelled_maps_to_503() {
        let err = AppError(DisruptionError::Cancelled("job".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn io_maps_to_500() {
        let err = AppError(DisruptionError::Io(std::io::Error::other("disk")).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn sentinel_not_found_maps_to_404() {
        let err = AppError::not_found("no job list");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("boom"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
