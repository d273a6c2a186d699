/// Unit reported alongside every calorie estimate.
pub const CURRENCY: &str = "cal";

/// Rounds a raw model output to two decimal places, half away from zero.
///
/// Magnitudes that would overflow when scaled are already whole numbers and
/// pass through unchanged.
pub fn round_calories(raw: f64) -> f64 {
    if raw.abs() >= f64::MAX / 100.0 {
        return raw;
    }
    (raw * 100.0).round() / 100.0
}

/// Calorie estimate for one validated feature record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    calories: f64,
}

impl PredictionResult {
    /// Builds a result from the raw model output.
    pub fn from_raw(raw: f64) -> Self {
        Self {
            calories: round_calories(raw),
        }
    }

    pub fn calories(&self) -> f64 {
        self.calories
    }

    pub fn currency(&self) -> &'static str {
        CURRENCY
    }
}
