//! Error types for cutrace

use crate::partition::Size;
use thiserror::Error;

/// Result type alias for cutrace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cutrace
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Split series could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Reconstructed leaf size disagrees with the declared one
    #[error("Geometry mismatch: declared leaf {declared}, reconstructed {reconstructed}")]
    GeometryMismatch { declared: Size, reconstructed: Size },

    /// A split cannot be applied to the current rectangle
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// A trace row has malformed fields
    #[error("Record format error: {0}")]
    RecordFormat(String),

    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Error::Decode(msg.into())
    }

    /// Create a geometry error
    pub fn geometry<S: Into<String>>(msg: S) -> Self {
        Error::Geometry(msg.into())
    }

    /// Create a record format error
    pub fn record_format<S: Into<String>>(msg: S) -> Self {
        Error::RecordFormat(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Whether this error only invalidates a single trace row.
    ///
    /// Row errors are reported and skipped; anything else aborts the file.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Error::Decode(_)
                | Error::GeometryMismatch { .. }
                | Error::Geometry(_)
                | Error::RecordFormat(_)
        )
    }
}
