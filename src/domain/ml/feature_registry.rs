use crate::domain::nutrition::{FeatureRecord, NutrientField};

/// Number of inputs the calorie model takes.
pub const FEATURE_COUNT: usize = 3;

/// Ordered list of feature names.
/// This order MUST match the column order the model was fitted with.
/// Any change here is a breaking change for model artifacts.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["protein", "fat", "sugars"];

/// Ordered numeric model input.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Converts a validated record into the model input vector.
pub fn features_to_vector(record: &FeatureRecord) -> FeatureVector {
    NutrientField::ALL.map(|field| f64::from(record.get(field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_fields() {
        for (name, field) in FEATURE_NAMES.iter().zip(NutrientField::ALL) {
            assert_eq!(*name, field.name());
        }
    }

    #[test]
    fn test_feature_order() {
        let record = FeatureRecord::new(3, 1, 9).expect("valid");
        assert_eq!(features_to_vector(&record), [3.0, 1.0, 9.0]);
    }
}
