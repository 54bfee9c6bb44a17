//! Maps service errors onto HTTP responses.
//!
//! Bodies are plain human-readable text, not structured error codes.

use crate::errors::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::DuplicateName { .. } => StatusCode::BAD_REQUEST,
            Self::PromotionNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
            (status, format!("Server error: {self}")).into_response()
        } else {
            debug!("Request rejected ({}): {}", status, self);
            (status, self.to_string()).into_response()
        }
    }
}
