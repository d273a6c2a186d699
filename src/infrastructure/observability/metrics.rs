//! Prometheus metrics definitions for the calorie service
//!
//! All metrics use the `cereal_` prefix.

use super::latency_tracker::LatencyGuard;
use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

pub const ENDPOINT_HELLO: &str = "hello";
pub const ENDPOINT_CEREAL: &str = "cereal";

pub const OUTCOME_SUCCESS: &str = "success";

/// Every outcome label the prediction endpoint can record
pub const PREDICTION_OUTCOMES: [&str; 4] = [
    OUTCOME_SUCCESS,
    "malformed_input",
    "validation_failure",
    "prediction_failure",
];

/// Prometheus metrics for the prediction service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Requests by endpoint and outcome
    pub requests_total: CounterVec,
    /// Time spent inside the predictor
    pub prediction_latency_seconds: Histogram,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
    /// Most recent successful prediction
    pub last_prediction_calories: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("cereal_requests_total", "Total requests by endpoint and outcome"),
            &["endpoint", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "cereal_prediction_latency_seconds",
                "Model inference latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
            ]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "cereal_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let last_prediction_calories = Gauge::with_opts(Opts::new(
            "cereal_last_prediction_calories",
            "Most recent successful calorie prediction",
        ))?;
        registry.register(Box::new(last_prediction_calories.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            prediction_latency_seconds,
            uptime_seconds,
            last_prediction_calories,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_requests(&self, endpoint: &str, outcome: &str) {
        self.requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    pub fn request_count(&self, endpoint: &str, outcome: &str) -> u64 {
        self.requests_total
            .with_label_values(&[endpoint, outcome])
            .get() as u64
    }

    /// Starts timing a predictor call; the sample is recorded on drop.
    pub fn prediction_timer(&self) -> LatencyGuard {
        LatencyGuard::new(self.prediction_latency_seconds.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        assert!(metrics.render().contains("cereal_"));
    }

    #[test]
    fn test_request_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_requests(ENDPOINT_CEREAL, OUTCOME_SUCCESS);
        metrics.inc_requests(ENDPOINT_CEREAL, OUTCOME_SUCCESS);
        metrics.inc_requests(ENDPOINT_CEREAL, "validation_failure");

        assert_eq!(metrics.request_count(ENDPOINT_CEREAL, OUTCOME_SUCCESS), 2);
        assert_eq!(metrics.request_count(ENDPOINT_CEREAL, "validation_failure"), 1);
        assert_eq!(metrics.request_count(ENDPOINT_HELLO, OUTCOME_SUCCESS), 0);

        let output = metrics.render();
        assert!(output.contains("cereal_requests_total"));
        assert!(output.contains("validation_failure"));
    }

    #[test]
    fn test_prediction_timer_observes() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        drop(metrics.prediction_timer());
        assert_eq!(metrics.prediction_latency_seconds.get_sample_count(), 1);
    }
}
