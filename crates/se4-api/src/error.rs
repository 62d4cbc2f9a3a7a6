//! Client-facing errors.

use axum::body::Body;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::encode::{EncodeError, encode_error};
use crate::handlers::respond;

/// Returned verbatim when the real error body cannot be produced.
const INTERNAL_ERROR_BODY: &str = r#"{"status":500,"message":"Internal error"}"#;

/// Errors the dispatcher reports to clients.
///
/// Test failures are not errors; they live inside a report.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method \"{0}\" not allowed")]
    MethodNotAllowed(Method),

    #[error("No such route \"{0}\"")]
    NotFound(String),

    /// The cause is logged, never sent to the client.
    #[error("internal error: {0}")]
    Internal(#[from] EncodeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let encoded = match &self {
            ApiError::Internal(cause) => {
                error!(error = %cause, "failed to build se4 response");
                return internal_error_response();
            }
            other => encode_error(status.as_u16(), &other.client_message()),
        };

        match encoded {
            Ok(body) => respond(status, mime::JSON, Body::from(body)),
            Err(e) => {
                error!(error = %e, "failed to encode error body");
                internal_error_response()
            }
        }
    }
}

/// The fixed 500 response. Needs no encoding, so it cannot fail.
fn internal_error_response() -> Response {
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        mime::JSON,
        Body::from(INTERNAL_ERROR_BODY),
    )
}

pub(crate) mod mime {
    pub const JSON: &str = "application/json";
    pub const TEXT: &str = "text/plain";
}
