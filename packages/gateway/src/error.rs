use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use common::api::ErrorBody;

/// Application-level error type.
///
/// Client-visible bodies stay generic; the detail carried by `Internal` is
/// only ever written to the log.
#[derive(Debug)]
pub enum AppError {
    /// The `file` multipart field was absent or empty.
    NoFile,
    /// Malformed request (bad filename, unreadable multipart field).
    Validation(String),
    /// Upload exceeds the configured size limit.
    PayloadTooLarge,
    /// Storage or other server-side failure.
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::NoFile => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "No file uploaded".into(),
                },
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorBody { error: msg }),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    error: "File exceeds the maximum upload size".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "File upload failed".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
