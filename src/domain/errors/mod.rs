// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug)]
pub enum DomainError {
    /// Source audio file has an extension we cannot convert
    #[error("Unsupported input format \"{extension}\" for {path}. Valid input formats are {valid}")]
    UnsupportedInputFormat {
        path: String,
        extension: String,
        valid: String,
    },

    /// Supplied or extracted stem metadata is malformed
    #[error("Invalid stem metadata: {0}")]
    MetadataFormat(String),

    /// A descriptive tag field could not be coerced to its required type
    #[error("Invalid value for tag field '{field}': {value} (expected {expected})")]
    TagValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// Tag source document is not a JSON object
    #[error("Invalid tag source: {0}")]
    InvalidTagSource(String),

    /// Referenced file (cover art, metadata file, tag file) is missing or unreadable
    #[error("Resource not found: {path}")]
    ResourceNotFound { path: String },

    /// External tool exited unsuccessfully or timed out
    #[error("{tool} failed{}: {stderr}", .status.map(|s| format!(" with exit status {}", s)).unwrap_or_default())]
    ExternalTool {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    /// External tool could not be located on this host
    #[error("Executable not found: {0}")]
    ToolNotFound(String),

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    /// Process exit code used when this error terminates the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            DomainError::ExternalTool {
                status: Some(status),
                ..
            } if *status != 0 => *status,
            DomainError::UnsupportedInputFormat { .. } => 2,
            DomainError::Config(_) => 3,
            _ => 1,
        }
    }
}
