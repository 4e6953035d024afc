// src/core/errors.rs
use thiserror::Error;

/// Message carried by the error returned when the explained input has no features.
pub const EMPTY_INPUT_MESSAGE: &str = "cannot explain a prediction whose input is empty";

#[derive(Debug, Error)]
pub enum ExplainError {
    /// A local explanation could not be produced. Displays the message verbatim.
    #[error("{0}")]
    LocalExplanation(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Incompatible Dimensions: {0}")]
    IncompatibleDimensions(String),

    #[error("Model Prediction Error: {0}")]
    ModelPrediction(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Explanation cancelled before completion")]
    Cancelled,

    #[error("Internal Error: {0}")]
    Internal(String),

    #[error("Ndarray Error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),

    #[error("Configuration Error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl ExplainError {
    pub fn empty_input() -> Self {
        Self::LocalExplanation(EMPTY_INPUT_MESSAGE.to_string())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn model_prediction(msg: impl Into<String>) -> Self {
        Self::ModelPrediction(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// Convenience type alias for Result
pub type Result<T> = std::result::Result<T, ExplainError>;
