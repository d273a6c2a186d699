//! Configuration module for the calorie service.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Model, and Observability.

mod model_config;
mod observability_config;
mod server_config;

pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Main application configuration.
///
/// Aggregates all sub-configs into flat fields for the rest of the
/// application.
#[derive(Debug, Clone)]
pub struct Config {
    // Server (from ServerEnvConfig)
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,

    // Model (from ModelEnvConfig)
    pub model_path: PathBuf,
    pub expose_internal_errors: bool,

    // Observability (from ObservabilityEnvConfig)
    pub observability_enabled: bool,
    pub observability_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::compose(
            ServerEnvConfig::default(),
            ModelEnvConfig::default(),
            ObservabilityEnvConfig::default(),
        )
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let model = ModelEnvConfig::from_env();
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self::compose(server, model, observability))
    }

    fn compose(
        server: ServerEnvConfig,
        model: ModelEnvConfig,
        observability: ObservabilityEnvConfig,
    ) -> Self {
        Self {
            host: server.host,
            port: server.port,
            workers: server.workers,
            model_path: model.model_path,
            expose_internal_errors: model.expose_internal_errors,
            observability_enabled: observability.enabled,
            observability_interval_secs: observability.interval_secs,
        }
    }

    /// `host:port` string for logging and binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
