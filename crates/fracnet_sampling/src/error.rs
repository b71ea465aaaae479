//! Error types for fracture sampling.

use thiserror::Error;

/// Errors raised while sampling a fracture population.
#[derive(Debug, Error)]
pub enum Error {
    /// Sampling parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Rejection placement ran out of attempts.
    #[error("placement exhausted: placed {placed} of {requested} fractures in {attempts} attempts")]
    PlacementExhausted {
        /// Fractures accepted before the budget ran out.
        placed: usize,
        /// Fractures requested.
        requested: usize,
        /// Attempts made.
        attempts: usize,
    },

    /// A sampled fracture failed model validation.
    #[error(transparent)]
    Model(#[from] fracnet_model::Error),
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result type alias for sampling operations.
pub type Result<T> = std::result::Result<T, Error>;
