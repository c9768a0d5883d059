use thiserror::Error;

/// Top-level error type used across the entire console.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("config error: {0}")]
    Config(String),

    /// Transport-level failure: connect, timeout, non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The endpoint answered but the body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The console answered but reported `success: false`.
    #[error("console reported failure: {0}")]
    Action(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = DashError> = std::result::Result<T, E>;
