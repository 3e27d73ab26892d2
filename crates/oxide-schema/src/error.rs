//! Error types for schema drop generation.

/// Errors that can occur while generating or delivering drop statements.
#[derive(Debug, thiserror::Error)]
pub enum DropError {
    /// The same export identifier produced SQL twice in one run.
    #[error("SQL strings added more than once for: {0}")]
    DuplicateExport(String),

    /// A target failed to prepare, accept or release.
    #[error("Target failed: {0}")]
    Target(String),

    /// A statement was sent to a target that was never prepared.
    #[error("Target '{0}' received a statement before being prepared")]
    TargetNotPrepared(String),

    /// No dialect is registered under the given name.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// The catalog definition is inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// IO error (writing script files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Multiple errors occurred.
    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<DropError>),
}

/// Result type for drop operations.
pub type Result<T> = std::result::Result<T, DropError>;
