use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::events::source::{RejectShape, Source};

/// Structured API error returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

/// Request-level failure outside the ingestion contract, such as a body that
/// could not be read or exceeded the configured limit.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            code: "PAYLOAD_TOO_LARGE".to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::debug!(%rejection, "failed to read request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large("Request body exceeds the configured limit")
        } else {
            Self::bad_request(rejection.body_text())
        }
    }
}

/// Body returned when an ingestion request carries no usable payload.
///
/// Older callers of the legacy endpoint expect `{status, message}`; newer
/// sources answer with `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RejectionBody {
    StatusMessage { status: String, message: String },
    Error { error: String },
}

/// Ingestion rejection that converts into a source-shaped HTTP response.
#[derive(Debug)]
pub struct Rejection {
    pub status: StatusCode,
    pub body: RejectionBody,
}

impl Rejection {
    /// Reject an empty payload in the shape the given source's callers expect.
    pub fn no_payload(source: Source) -> Self {
        let body = match source.policy().reject {
            RejectShape::StatusMessage { status, message } => RejectionBody::StatusMessage {
                status: status.to_string(),
                message: message.to_string(),
            },
            RejectShape::Error(error) => RejectionBody::Error {
                error: error.to_string(),
            },
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            body,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
