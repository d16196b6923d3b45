//! Error types for the face tracking library.

use thiserror::Error;

/// Main error type for the library.
///
/// Tracking anomalies (lost identities, empty detections, collaborator
/// failures) never surface here; they degrade to the next detection cycle.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pixel buffer does not describe a valid frame
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
