use crate::application::ml::CaloriePredictor;
use crate::domain::errors::{ApiError, PredictionError};
use crate::domain::ml::feature_registry::features_to_vector;
use crate::domain::nutrition::{FeatureRecord, PredictionResult};
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::observability::metrics::{ENDPOINT_CEREAL, OUTCOME_SUCCESS};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Message returned for predictor failures when internal details are hidden.
pub const GENERIC_PREDICTION_ERROR: &str = "Internal prediction error";

/// Orchestrates one prediction request: parse → validate → predict → format.
///
/// Holds the single immutable predictor handle; every call is independent.
pub struct PredictionService {
    predictor: Arc<dyn CaloriePredictor>,
    metrics: Metrics,
    expose_internal_errors: bool,
}

impl PredictionService {
    pub fn new(
        predictor: Arc<dyn CaloriePredictor>,
        metrics: Metrics,
        expose_internal_errors: bool,
    ) -> Self {
        Self {
            predictor,
            metrics,
            expose_internal_errors,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Handles a raw request body. Never panics on client input; every
    /// failure is classified into an [`ApiError`].
    pub fn handle(&self, raw_body: &[u8]) -> Result<PredictionResult, ApiError> {
        let result = self.evaluate(raw_body);

        match &result {
            Ok(prediction) => {
                self.metrics.inc_requests(ENDPOINT_CEREAL, OUTCOME_SUCCESS);
                self.metrics
                    .last_prediction_calories
                    .set(prediction.calories());
                debug!("Predicted {} cal", prediction.calories());
            }
            Err(e) => {
                self.metrics.inc_requests(ENDPOINT_CEREAL, e.outcome());
                match e {
                    ApiError::PredictionFailure { .. } => {}
                    _ => warn!("Rejected prediction request: {}", e),
                }
            }
        }

        result
    }

    fn evaluate(&self, raw_body: &[u8]) -> Result<PredictionResult, ApiError> {
        let value = parse_body(raw_body)?;
        let record = FeatureRecord::from_json(&value).map_err(ApiError::ValidationFailure)?;
        let features = features_to_vector(&record);

        let raw = {
            let _timer = self.metrics.prediction_timer();
            self.predictor.predict(&features)
        }
        .map_err(|e| self.prediction_failure(e))?;

        Ok(PredictionResult::from_raw(raw))
    }

    fn prediction_failure(&self, e: PredictionError) -> ApiError {
        error!(
            "Predictor {} ({}) failed: {}",
            self.predictor.name(),
            self.predictor.version(),
            e
        );
        let message = if self.expose_internal_errors {
            e.to_string()
        } else {
            GENERIC_PREDICTION_ERROR.to_string()
        };
        ApiError::PredictionFailure { message }
    }
}

/// Parses the request body. Objects and arrays pass through (an array is
/// later reported as missing every field); anything else is malformed.
fn parse_body(raw_body: &[u8]) -> Result<Value, ApiError> {
    if raw_body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MalformedInput {
            detail: "Failed to decode JSON object: request body is empty".to_string(),
        });
    }

    let value: Value =
        serde_json::from_slice(raw_body).map_err(|e| ApiError::MalformedInput {
            detail: format!("Failed to decode JSON object: {}", e),
        })?;

    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        other => Err(ApiError::MalformedInput {
            detail: format!(
                "Failed to decode JSON object: expected an object, got {}",
                json_kind(&other)
            ),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
