//! HTTP server configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// HTTP server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; `None` keeps the actix default (one per core)
    pub workers: Option<usize>,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Failed to parse SERVER_PORT: {}", raw))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or(defaults.host),
            port,
            workers: env::var("SERVER_WORKERS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|w| *w > 0),
        })
    }
}
