//! Push-based observability for the calorie service
//!
//! Metrics are kept in a Prometheus registry and pushed out as structured
//! JSON log lines on a fixed interval. There is no metrics endpoint; the HTTP
//! surface stays limited to the prediction API.

pub mod latency_tracker;
pub mod metrics;
pub mod reporter;

pub use latency_tracker::LatencyGuard;
pub use metrics::Metrics;
pub use reporter::MetricsReporter;
