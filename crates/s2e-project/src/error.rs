//! Error taxonomy for project configuration rules.

/// Boxed error raised by a binary analyzer, kept intact for the caller.
pub type AnalyzerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while validating or analyzing a project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// An option is present that the selected project kind cannot support.
    #[error("{0}")]
    Configuration(String),

    #[error("missing configuration option: {key}")]
    MissingOption { key: String },

    #[error("configuration option {key} must be {expected}")]
    InvalidOption { key: String, expected: &'static str },

    #[error("unknown project kind: {0}")]
    UnknownKind(String),

    /// Failure reported by the binary analyzer, propagated unchanged.
    #[error("binary analysis failed: {0}")]
    Analysis(#[source] AnalyzerError),

    #[error("invalid image catalog: {0}")]
    Catalog(#[source] serde_json::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProjectError {
    pub fn analysis<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ProjectError::Analysis(Box::new(err))
    }
}

/// Result type for project configuration operations.
pub type Result<T> = std::result::Result<T, ProjectError>;
