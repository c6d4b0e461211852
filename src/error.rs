//! Error types for the spend forecast service

use crate::types::Horizon;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Top-level error for loading, serving and calling the predictor
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load model for {horizon}: {reason}")]
    ModelLoad { horizon: Horizon, reason: String },

    #[error("Inference failed for {horizon}: {source}")]
    Inference {
        horizon: Horizon,
        #[source]
        source: ModelFault,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: status {status}")]
    Api { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    /// Build a model load error with a formatted reason
    pub fn model_load(horizon: Horizon, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            horizon,
            reason: reason.into(),
        }
    }
}

/// Malformed or missing input field. Always names the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("field {0} must be ≥ 0")]
    Negative(&'static str),

    #[error("field {0} must be an integer")]
    NotInteger(&'static str),

    #[error("field {0} must be a number")]
    NotNumber(&'static str),
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(f) | Self::Negative(f) | Self::NotInteger(f) | Self::NotNumber(f) => *f,
        }
    }
}

/// Failure raised by a regressor while evaluating a feature vector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelFault {
    #[error("non-finite output {0}")]
    NonFinite(f64),

    #[error("tree {tree} did not reach a leaf")]
    UnterminatedTree { tree: usize },

    #[error("{0}")]
    Other(String),
}
