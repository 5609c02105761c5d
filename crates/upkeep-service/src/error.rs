use thiserror::Error;
use upkeep_core::error::CoreError;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CoreError(CoreError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Core validation failures surface as `ValidationError` so callers match one variant.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(message) => Self::ValidationError(message),
            other => Self::CoreError(other),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
