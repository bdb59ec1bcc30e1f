use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::cart::CartError;
use thiserror::Error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// JSON error response: `{"error": ..., "code": ..., "message": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: Option<u16>,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, code: None, message }
    }
}

impl From<CartError> for JsonApiError {
    fn from(e: CartError) -> Self {
        let (status, error) = match &e {
            CartError::OutOfStock { .. } => (StatusCode::CONFLICT, "Out Of Stock"),
            CartError::NotInCart { .. } | CartError::RemoveFailed { .. } => (StatusCode::NOT_FOUND, "Not Found"),
            CartError::AddFailed { .. } | CartError::UpdateFailed { .. } => (StatusCode::BAD_GATEWAY, "Bad Gateway"),
        };
        Self { status, error, code: Some(e.code()), message: Some(e.to_string()) }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.error, code: self.code, message: self.message };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("service setup failed: {0}")]
    Service(#[from] service::errors::ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
