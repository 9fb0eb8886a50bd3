use thiserror::Error;

use crate::codes;

/// Top-level error for debugger front ends
#[derive(Error, Debug)]
pub enum DebuggerError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bad command-line input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Unusable input data (fixtures, captured trees)
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Authorization service could not be set up
    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DebuggerError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DebuggerError::ConfigError(_) => codes::system::CONFIG,
            DebuggerError::ValidationError(_) => codes::usage::INVALID_ARGUMENTS,
            DebuggerError::InputError(_) => codes::data::INVALID_INPUT,
            DebuggerError::ExternalError(_) => codes::service::UNAVAILABLE,
            DebuggerError::IoError(_) => codes::system::IO,
            DebuggerError::SerializationError(_) | DebuggerError::Other(_) => codes::system::INTERNAL,
        }
    }
}

/// Result type alias for debugger operations
pub type Result<T> = std::result::Result<T, DebuggerError>;

/// Log an error with the context it happened in
pub fn log_error(context: &str, error: &DebuggerError) {
    tracing::error!(
        context = context,
        error = %error,
        exit_code = error.exit_code(),
        "Debugger error occurred"
    );
}
