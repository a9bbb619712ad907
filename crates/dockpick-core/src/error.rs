//! Error types for dockpick-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("No running container matches '{0}'")]
    ContainerNotFound(String),

    #[error("'{token}' matches {} containers: {}", .candidates.len(), .candidates.join(", "))]
    AmbiguousTarget {
        token: String,
        candidates: Vec<String>,
    },

    #[error("Invalid choice: {0}")]
    InvalidMenuChoice(String),

    #[error("Invalid selection: {0}")]
    InvalidListingInput(String),

    #[error("{action} failed for {container}: {reason}")]
    ActionFailed {
        action: String,
        container: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] dockpick_config::ConfigError),

    #[error("State file error at {path}: {source}")]
    Store {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dockpick_provider::ProviderError> for CoreError {
    fn from(err: dockpick_provider::ProviderError) -> Self {
        if err.is_unavailable() {
            CoreError::RuntimeUnavailable(err.to_string())
        } else if let dockpick_provider::ProviderError::ContainerNotFound(name) = err {
            CoreError::ContainerNotFound(name)
        } else {
            CoreError::ActionFailed {
                action: "runtime call".to_string(),
                container: String::new(),
                reason: err.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
