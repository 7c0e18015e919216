//! Error types for cmdlink.

use thiserror::Error;

/// Main error type for all cmdlink operations.
///
/// Framing problems (missing delimiters, no field delimiter) and unknown
/// command names are not errors: they are discarded silently.
#[derive(Debug, Error)]
pub enum CmdlinkError {
    /// Frame content would exceed the accumulator capacity.
    #[error("Frame overflow: {attempted} bytes exceeds capacity {capacity}")]
    Overflow {
        /// Configured maximum content length.
        capacity: usize,
        /// Content length the append would have produced.
        attempted: usize,
    },

    /// Handler arguments could not be parsed.
    #[error("Argument error: {0}")]
    Argument(String),

    /// A handler reported a failure.
    #[error("Handler error: {0}")]
    Handler(String),

    /// Invalid framing or link configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON error while loading configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading from the link.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using CmdlinkError.
pub type Result<T> = std::result::Result<T, CmdlinkError>;
