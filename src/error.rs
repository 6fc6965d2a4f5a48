//! Error types for compose-model

use thiserror::Error;

/// Result type for compose-model operations
pub type Result<T> = std::result::Result<T, ComposeError>;

/// compose-model error types
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("one of the build or image sections must be present!")]
    MissingBuildOrImage,

    #[error("Service '{name}': {source}")]
    InvalidService {
        name: String,
        #[source]
        source: Box<ComposeError>,
    },

    #[error("Compose file parse error: {0}")]
    ComposeParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}

impl ComposeError {
    /// Whether this is the build/image validation failure, possibly wrapped
    /// in the service that raised it.
    pub fn is_validation(&self) -> bool {
        match self {
            ComposeError::MissingBuildOrImage => true,
            ComposeError::InvalidService { source, .. } => source.is_validation(),
            _ => false,
        }
    }

    /// Attach the name of the service that failed.
    pub(crate) fn in_service(self, name: &str) -> Self {
        ComposeError::InvalidService {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}
