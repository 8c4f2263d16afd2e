//! Error types for the gesture controller library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Input injection failed (X11 connection, XTEST, or flush)
    #[error("Injection error: {0}")]
    Injection(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A mapping table asserted both members of a mutually exclusive pair
    #[error("Conflicting exclusive actions: {0} and {1}")]
    ExclusiveConflict(String, String),

    /// Landmark frame failed to decode or had the wrong shape
    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::FrameDecode(e.to_string())
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
