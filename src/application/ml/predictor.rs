use crate::domain::errors::PredictionError;

/// Interface for calorie regression models
pub trait CaloriePredictor: Send + Sync {
    /// Predict calories for one ordered feature vector.
    ///
    /// Implementations must be safe to call concurrently and must not mutate
    /// shared state.
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
