//! Error types for the fracture network model.

use thiserror::Error;

/// Errors that can occur while building or loading a fracture network model.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings or geometry violate a model constraint.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A fracture list record could not be parsed.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number of the record.
        line: usize,
        /// Reason the record was rejected.
        reason: String,
    },

    /// A fracture list record names a shape that is not recognized.
    #[error("unknown shape '{token}' at line {line}")]
    UnknownShape {
        /// 1-based line number of the record.
        line: usize,
        /// The unrecognized shape token.
        token: String,
    },

    /// Unknown or unsupported settings file format.
    #[error("unknown settings format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Delimited-text parsing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Creates a malformed record error for the given line.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;
