//! API error types.

use std::any::Any;

use axum::Json;
use axum::body::HttpBody;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::api::envelope::Envelope;
use crate::store::StoreError;

const INTERNAL_MESSAGE: &str = "Something went wrong";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("User not found")]
    NotFound,

    #[error("Error parsing the request body: {0}")]
    MalformedInput(String),

    #[error("Invalid user id: {0}")]
    MalformedIdentifier(String),

    /// The request body could not be read, e.g. it exceeds the size limit
    #[error("{message}")]
    BodyRejected { status: StatusCode, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::BodyRejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::LockPoisoned(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::BodyRejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Internal(detail) => {
                error!(%detail, "request failed");
                INTERNAL_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(Envelope::<()>::message(message))).into_response()
    }
}

/// Turn a handler panic into an opaque 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Give error responses produced outside the handlers (timeouts, for one)
/// the `{message}` envelope when they carry no body.
pub async fn envelope_empty_errors(response: Response) -> Response {
    let status = response.status();
    let is_error = status.is_client_error() || status.is_server_error();
    if !is_error || response.body().size_hint().exact() != Some(0) {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.remove(CONTENT_TYPE);

    let message = status.canonical_reason().unwrap_or("Request failed");
    let mut rebuilt = Json(Envelope::<()>::message(message)).into_response();
    *rebuilt.status_mut() = status;
    rebuilt.headers_mut().extend(parts.headers);
    rebuilt
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
