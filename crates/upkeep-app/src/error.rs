use thiserror::Error;

/// Application-level errors (feed export)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] upkeep_service::error::ServiceError),

    #[error(transparent)]
    CoreError(#[from] upkeep_core::error::CoreError),

    #[error("Failed to read events file {path}: {source}")]
    EventsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
