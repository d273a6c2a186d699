// Metrics and push-based reporting
pub mod observability;
