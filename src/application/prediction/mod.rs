pub mod service;

pub use service::{GENERIC_PREDICTION_ERROR, PredictionService};
