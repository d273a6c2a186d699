//! Cereal calorie prediction server
//!
//! Loads the model artifact once, then serves the prediction API.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=cereal-calories.json cargo run -- --port 8000
//! ```
//!
//! # Environment Variables
//! - `SERVER_HOST` / `SERVER_PORT` / `SERVER_WORKERS` - Listen address and worker count
//! - `MODEL_PATH` - Model artifact (default: cereal-calories.json)
//! - `EXPOSE_INTERNAL_ERRORS` - Return predictor error text in 500 responses (default: true)
//! - `OBSERVABILITY_ENABLED` / `OBSERVABILITY_INTERVAL` - Push-based metrics reporting

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use cereal_calories::application::ml::{CaloriePredictor, SmartCorePredictor};
use cereal_calories::application::prediction::PredictionService;
use cereal_calories::config::Config;
use cereal_calories::infrastructure::observability::{Metrics, MetricsReporter};
use cereal_calories::interfaces::http;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Interface to listen on (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Path to the model artifact (overrides MODEL_PATH)
    #[arg(long)]
    model_path: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();

    info!("Cereal calorie server {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(model_path) = args.model_path {
        config.model_path = model_path;
    }
    info!(
        "Configuration loaded: Bind={}, Model={:?}, Workers={:?}",
        config.bind_address(),
        config.model_path,
        config.workers
    );
    if config.expose_internal_errors {
        warn!("Predictor error text is returned to clients (EXPOSE_INTERNAL_ERRORS=true)");
    }

    // Without a model no request can be served: fail before binding
    let predictor = SmartCorePredictor::load(&config.model_path)
        .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;
    info!(
        "Model ready: {} ({}) from {:?}",
        predictor.name(),
        predictor.version(),
        predictor.model_path()
    );

    let metrics = Metrics::new().context("Failed to create metrics registry")?;

    if config.observability_enabled {
        let reporter = MetricsReporter::new(
            metrics.clone(),
            predictor.name(),
            predictor.version(),
            config.observability_interval_secs,
        );

        tokio::spawn(async move {
            reporter.run().await;
        });

        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability_interval_secs
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    let service = web::Data::new(PredictionService::new(
        Arc::new(predictor),
        metrics,
        config.expose_internal_errors,
    ));

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(http::cors())
            .app_data(service.clone())
            .configure(http::configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    info!("Listening on http://{}", config.bind_address());
    server
        .bind((config.host.as_str(), config.port))
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?
        .run()
        .await?;

    info!("Server stopped.");
    Ok(())
}
