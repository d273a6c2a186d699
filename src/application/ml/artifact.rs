//! Serialized model artifact.
//!
//! An artifact is a JSON envelope around a serde-serialized smartcore
//! regressor:
//!
//! ```json
//! {
//!   "feature_names": ["protein", "fat", "sugars"],
//!   "version": "2024-05-01",
//!   "fitted_width": 3,
//!   "regressor": { "kind": "linear_regression", "model": { ... } }
//! }
//! ```

use crate::domain::errors::ModelLoadError;
use crate::domain::ml::feature_registry::FEATURE_NAMES;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::error::Failed;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{info, warn};

pub type LinearModel = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;
pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Supported regressor families
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum Regressor {
    LinearRegression(LinearModel),
    RandomForest(ForestModel),
}

impl Regressor {
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::LinearRegression(_) => "linear_regression",
            Regressor::RandomForest(_) => "random_forest",
        }
    }

    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, Failed> {
        match self {
            Regressor::LinearRegression(model) => model.predict(x),
            Regressor::RandomForest(model) => model.predict(x),
        }
    }

    /// Input width recoverable from the fitted parameters themselves.
    ///
    /// Forests do not expose it; their width has to be recorded alongside.
    pub fn fitted_width(&self) -> Option<usize> {
        match self {
            Regressor::LinearRegression(model) => {
                // coefficients() panics when the model was never fitted
                panic::catch_unwind(AssertUnwindSafe(|| model.coefficients().shape().0)).ok()
            }
            Regressor::RandomForest(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Column names in the order the regressor was fitted with
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Number of columns the regressor was fitted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitted_width: Option<usize>,
    pub regressor: Regressor,
}

impl ModelArtifact {
    /// Wraps a fitted regressor using the standard feature layout.
    ///
    /// Linear models carry their width; forests need [`Self::with_fitted_width`].
    pub fn new(regressor: Regressor) -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            version: None,
            fitted_width: regressor.fitted_width(),
            regressor,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_fitted_width(mut self, width: usize) -> Self {
        self.fitted_width = Some(width);
        self
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Width the regressor actually accepts, preferring what the fitted
    /// parameters say over the recorded value.
    pub fn input_width(&self) -> Option<usize> {
        self.regressor.fitted_width().or(self.fitted_width)
    }

    /// Rejects artifacts whose declared features cannot be fed to the
    /// regressor they wrap.
    pub fn check_width(&self) -> Result<(), ModelLoadError> {
        match (self.regressor.fitted_width(), self.fitted_width) {
            (Some(fitted), Some(recorded)) if fitted != recorded => {
                return Err(ModelLoadError::WidthMismatch {
                    declared: recorded,
                    fitted,
                });
            }
            _ => {}
        }

        let fitted = self.input_width().ok_or(ModelLoadError::UnknownWidth {
            kind: self.regressor.kind(),
        })?;
        if fitted != self.n_features() {
            return Err(ModelLoadError::WidthMismatch {
                declared: self.n_features(),
                fitted,
            });
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let buffer = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact: ModelArtifact =
            serde_json::from_slice(&buffer).map_err(|source| ModelLoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        if artifact.feature_names.is_empty() {
            return Err(ModelLoadError::NoFeatures);
        }
        artifact.check_width()?;

        if artifact.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            // Served anyway; a different width fails per request
            warn!(
                "Model features {:?} do not match request features {:?}",
                artifact.feature_names, FEATURE_NAMES
            );
        }

        info!(
            "Loaded {} model from {:?} ({} features)",
            artifact.regressor.kind(),
            path,
            artifact.n_features()
        );
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelLoadError> {
        let json = serde_json::to_string(self).map_err(|source| ModelLoadError::Encode { source })?;
        std::fs::write(path, json).map_err(|source| ModelLoadError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
