use common::CoreError;
use models::errors::ModelError;
use thiserror::Error;

/// Failures reported by the cart's collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("remote api error: {0}")]
    Remote(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Status { status: 404, url } => Self::NotFound(url),
            CoreError::Parse(msg) => Self::Decode(msg),
            other => Self::Remote(other.to_string()),
        }
    }
}
