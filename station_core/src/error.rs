//! Error types for the station_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for station_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source record is missing a required field or it does not parse.
    ///
    /// Rejects the whole catalog load so station indices stay contiguous.
    #[error("Malformed station at row {row}: {reason}")]
    MalformedStation { row: usize, reason: String },

    /// Station index outside the catalog bounds
    #[error("Unknown station index {index} (catalog has {len} stations)")]
    UnknownStation { index: usize, len: usize },

    /// Exact display-name lookup found nothing
    #[error("No station named '{0}'")]
    StationNameNotFound(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted position or history could not be interpreted
    #[error("State error: {0}")]
    State(String),
}

impl Error {
    /// Errors the interactive shell reports and then keeps prompting after.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::StationNameNotFound(_) | Error::UnknownStation { .. }
        )
    }
}
