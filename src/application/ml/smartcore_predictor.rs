use super::artifact::ModelArtifact;
use super::predictor::CaloriePredictor;
use crate::domain::errors::{ModelLoadError, PredictionError};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

const DEFAULT_VERSION: &str = "unversioned";

/// Predictor backed by a smartcore regressor loaded from a JSON artifact.
///
/// The artifact is read once; the predictor is immutable afterwards and can
/// be shared across workers without locking.
pub struct SmartCorePredictor {
    artifact: ModelArtifact,
    model_path: PathBuf,
    name: String,
    input_width: usize,
}

impl SmartCorePredictor {
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        let artifact = ModelArtifact::load(model_path)?;
        Ok(Self::from_artifact(artifact, model_path.to_path_buf()))
    }

    pub fn from_artifact(artifact: ModelArtifact, model_path: PathBuf) -> Self {
        let name = format!("SmartCore {}", artifact.regressor.kind());
        let input_width = artifact
            .input_width()
            .unwrap_or_else(|| artifact.n_features());
        Self {
            artifact,
            model_path,
            name,
            input_width,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }
}

impl CaloriePredictor for SmartCorePredictor {
    fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let expected = self.input_width;
        if features.len() != expected {
            return Err(PredictionError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }

        let input_matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()]).map_err(|e| {
            PredictionError::InvalidInput {
                reason: e.to_string(),
            }
        })?;

        // smartcore indexes out of bounds instead of erroring on a width it
        // was not fitted on
        let predictions = panic::catch_unwind(AssertUnwindSafe(|| {
            self.artifact.regressor.predict(&input_matrix)
        }))
        .map_err(|payload| PredictionError::Model {
            reason: format!("regressor panicked: {}", panic_message(payload.as_ref())),
        })?
        .map_err(|e| PredictionError::Model {
            reason: e.to_string(),
        })?;

        let prediction = *predictions.first().ok_or(PredictionError::NoOutput)?;
        if !prediction.is_finite() {
            return Err(PredictionError::NonFinite { value: prediction });
        }
        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        self.artifact.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown cause"
    }
}
