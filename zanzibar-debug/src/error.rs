use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebugError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Expansion service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Failed to decode expansion response: {0}")]
    Decode(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Injected failure for {0}")]
    Injected(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<reqwest::Error> for DebugError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DebugError::Decode(err.to_string())
        } else {
            DebugError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DebugError {
    fn from(err: serde_json::Error) -> Self {
        DebugError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DebugError>;
