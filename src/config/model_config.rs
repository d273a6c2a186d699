//! Model artifact configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "cereal-calories.json";

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_path: PathBuf,
    /// Return raw predictor error text in 500 responses
    pub expose_internal_errors: bool,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            expose_internal_errors: true,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),
            expose_internal_errors: env::var("EXPOSE_INTERNAL_ERRORS")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
        }
    }
}
