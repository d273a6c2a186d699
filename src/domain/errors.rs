use crate::domain::nutrition::FieldErrors;
use std::path::PathBuf;
use thiserror::Error;

/// Message returned to clients when the body cannot be read as JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// Errors raised while loading the model artifact at startup
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to deserialize model {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Model artifact declares no input features")]
    NoFeatures,

    #[error("Model declares {declared} features but its regressor was fitted on {fitted}")]
    WidthMismatch { declared: usize, fitted: usize },

    #[error("Input width of the {kind} regressor is unknown; record fitted_width in the artifact")]
    UnknownWidth { kind: &'static str },

    #[error("Failed to serialize model: {source}")]
    Encode { source: serde_json::Error },

    #[error("Failed to write model file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised by a single predictor invocation
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("X has {actual} features, but the model is expecting {expected} features as input")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Matrix creation failed: {reason}")]
    InvalidInput { reason: String },

    #[error("Prediction failed: {reason}")]
    Model { reason: String },

    #[error("No prediction returned")]
    NoOutput,

    #[error("Model returned a non-finite prediction: {value}")]
    NonFinite { value: f64 },
}

/// Per-request failures of the prediction endpoint.
///
/// Each variant maps to exactly one HTTP status and payload shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON format: {detail}")]
    MalformedInput { detail: String },

    #[error("Validation failed: {0}")]
    ValidationFailure(FieldErrors),

    #[error("{message}")]
    PredictionFailure { message: String },
}

impl ApiError {
    /// Stable label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::MalformedInput { .. } => "malformed_input",
            ApiError::ValidationFailure(_) => "validation_failure",
            ApiError::PredictionFailure { .. } => "prediction_failure",
        }
    }
}
