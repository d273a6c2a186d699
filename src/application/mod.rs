// Model loading and inference
pub mod ml;

// Prediction endpoint orchestration
pub mod prediction;
