//! Error handling for KeyBench

use thiserror::Error;

/// Main error type for KeyBench operations
#[derive(Error, Debug)]
pub enum KeyBenchError {
    #[error("Unknown identifier encoding: {0}")]
    UnknownEncoding(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, KeyBenchError>;

/// Result type alias for KeyBench operations (alias for Result)
pub type KeyBenchResult<T> = std::result::Result<T, KeyBenchError>;

impl From<csv::Error> for KeyBenchError {
    fn from(err: csv::Error) -> Self {
        KeyBenchError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for KeyBenchError {
    fn from(err: serde_json::Error) -> Self {
        KeyBenchError::Parse(err.to_string())
    }
}

/// Macro for creating source errors
#[macro_export]
macro_rules! source_err {
    ($msg:expr) => {
        $crate::common::error::KeyBenchError::Source($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::common::error::KeyBenchError::Source(format!($fmt, $($arg)*))
    };
}
