//! Error types for realizations and reports.

use thiserror::Error;

/// Errors raised while running a realization or handling its reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Model construction or validation failed.
    #[error(transparent)]
    Model(#[from] fracnet_model::Error),

    /// Sampling failed, including exhausted rejection placement.
    #[error(transparent)]
    Sampling(#[from] fracnet_sampling::Error),

    /// An expected report is missing from a destination.
    #[error("report '{report}' not found in {destination}")]
    MissingReport {
        /// Report file name.
        report: String,
        /// Destination label.
        destination: String,
    },

    /// A report exists but does not have the expected layout.
    #[error("malformed report '{report}': {reason}")]
    MalformedReport {
        /// Report file name.
        report: String,
        /// What was wrong with it.
        reason: String,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Delimited-text error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Creates a malformed report error.
    pub fn malformed(report: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedReport {
            report: report.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for realization operations.
pub type Result<T> = std::result::Result<T, Error>;
