//! Request-boundary error type and its JSON rendering.
//!
//! # Invariants
//! - Every error body is `{"error": "<message>"}`.
//! - Store failures never leak details to the client; they are logged.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use skilltrack_core::{RecordKind, ServiceError};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const INTERNAL_MESSAGE: &str = "internal store error";

/// Error returned from HTTP handlers.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed body, malformed id, or failed validation.
    BadRequest(String),
    NotFound(String),
    /// Store failure; details were already logged.
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) => f.write_str(message),
            Self::Internal => f.write_str(INTERNAL_MESSAGE),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        if value.is_validation() {
            return Self::BadRequest(value.to_string());
        }
        match value {
            ServiceError::NotFound { kind, .. } => {
                Self::NotFound(format!("{} not found", kind.label()))
            }
            other => {
                error!("event=store_call module=http status=error error={other}");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid body: {}", value.body_text()))
    }
}

/// Parses a path segment as a record id.
pub fn parse_id(raw: &str, kind: RecordKind) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("invalid {} id: `{raw}`", kind.label())))
}
