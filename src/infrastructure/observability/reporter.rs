//! Push-based metrics reporter
//!
//! Periodically outputs request and model statistics as structured JSON to
//! stdout.

use crate::infrastructure::observability::metrics::{
    ENDPOINT_CEREAL, ENDPOINT_HELLO, Metrics, OUTCOME_SUCCESS, PREDICTION_OUTCOMES,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model: ModelSnapshot,
    pub requests: RequestSnapshot,
}

#[derive(Serialize)]
pub struct ModelSnapshot {
    pub name: String,
    pub version: String,
    pub predictions: u64,
    pub mean_latency_ms: Option<f64>,
}

#[derive(Serialize)]
pub struct RequestSnapshot {
    pub hello: u64,
    /// Prediction requests keyed by outcome
    pub cereal: BTreeMap<String, u64>,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    metrics: Metrics,
    model_name: String,
    model_version: String,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    /// Create a new metrics reporter
    ///
    /// # Arguments
    /// * `metrics` - Shared Prometheus metrics
    /// * `model_name` / `model_version` - Identify the loaded model in snapshots
    /// * `interval_seconds` - How often to output metrics
    pub fn new(
        metrics: Metrics,
        model_name: impl Into<String>,
        model_version: impl Into<String>,
        interval_seconds: u64,
    ) -> Self {
        Self {
            metrics,
            model_name: model_name.into(),
            model_version: model_version.into(),
            start_time: Instant::now(),
            // A zero interval would spin
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Use a special prefix so logs can be easily filtered
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Predictions: {} | Uptime: {}s",
                        snapshot.model.predictions, snapshot.uptime_seconds
                    );
                    debug!("Prometheus exposition:\n{}", self.metrics.render());
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    /// Collect current metrics snapshot
    pub fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let cereal = PREDICTION_OUTCOMES
            .iter()
            .map(|outcome| {
                (
                    outcome.to_string(),
                    self.metrics.request_count(ENDPOINT_CEREAL, outcome),
                )
            })
            .collect();

        let latency = &self.metrics.prediction_latency_seconds;
        let samples = latency.get_sample_count();
        let mean_latency_ms =
            (samples > 0).then(|| latency.get_sample_sum() / samples as f64 * 1000.0);

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: ModelSnapshot {
                name: self.model_name.clone(),
                version: self.model_version.clone(),
                predictions: self.metrics.request_count(ENDPOINT_CEREAL, OUTCOME_SUCCESS),
                mean_latency_ms,
            },
            requests: RequestSnapshot {
                hello: self.metrics.request_count(ENDPOINT_HELLO, OUTCOME_SUCCESS),
                cereal,
            },
        }
    }
}
