//! Error taxonomy for the forecasting pipeline.
//!
//! Every operation reports one of these variants with a human-readable reason.
//! None of them are retried internally and none are fatal to the process.

use thiserror::Error;

/// Result alias used across the forecasting pipeline.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors produced by the forecasting pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Malformed input observation (missing or unparseable date or value).
    #[error("invalid observation: {0}")]
    Validation(String),

    /// Too few trainable samples to fit a line.
    #[error("not enough data to train: need at least {required} observations, found {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Encoded dates have zero variance, so no slope is defined.
    #[error("degenerate training data: {0}")]
    DegenerateInput(String),

    /// Prediction requested before any model was persisted.
    #[error("model not trained yet")]
    ModelNotTrained,

    /// The underlying store is unreachable or a write failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ForecastError {
    /// Wraps any store failure, keeping the full context chain in the message.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Storage(format!("{:#}", err.into()))
    }

    /// Returns true for failures caused by the caller's input or the data set,
    /// as opposed to infrastructure failures.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
