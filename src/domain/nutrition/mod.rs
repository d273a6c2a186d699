//! Nutrition domain: the three features a cereal is described by, their
//! validation rules and the calorie estimate returned to clients.

pub mod features;
pub mod prediction;

pub use features::{FeatureRecord, FieldErrors, NutrientField, Violation};
pub use prediction::{CURRENCY, PredictionResult, round_calories};
