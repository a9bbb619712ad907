//! Error types for the runtime gateway

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to connect to container runtime: {0}")]
    ConnectionError(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Exec failed: {0}")]
    ExecError(String),

    #[error("Container runtime error: {0}")]
    RuntimeError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<bollard::errors::Error> for ProviderError {
    fn from(err: bollard::errors::Error) -> Self {
        use bollard::errors::Error;
        match err {
            Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => ProviderError::ContainerNotFound(message),
            Error::IOError { err } => ProviderError::ConnectionError(err.to_string()),
            Error::HyperResponseError { err } => ProviderError::ConnectionError(err.to_string()),
            Error::RequestTimeoutError => {
                ProviderError::ConnectionError("request timed out".to_string())
            }
            other => ProviderError::RuntimeError(other.to_string()),
        }
    }
}

impl ProviderError {
    /// Whether the runtime itself could not be reached
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::ConnectionError(_))
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
