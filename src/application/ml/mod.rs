pub mod artifact;
pub mod predictor;
pub mod smartcore_predictor;

pub use artifact::{ModelArtifact, Regressor};
pub use predictor::CaloriePredictor;
pub use smartcore_predictor::SmartCorePredictor;
