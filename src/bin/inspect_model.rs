//! Loads a model artifact the same way the server does and runs a single
//! prediction through the full validation pipeline.
//!
//! ```sh
//! cargo run --bin inspect_model -- --model cereal-calories.json --protein 3 --fat 1 --sugars 9
//! ```

use anyhow::{Context, Result};
use cereal_calories::application::ml::{CaloriePredictor, SmartCorePredictor};
use cereal_calories::application::prediction::PredictionService;
use cereal_calories::config::DEFAULT_MODEL_PATH;
use cereal_calories::infrastructure::observability::Metrics;
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the model artifact
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Protein (g)
    #[arg(long, default_value_t = 3)]
    protein: i64,

    /// Fat (g)
    #[arg(long, default_value_t = 1)]
    fat: i64,

    /// Sugars (g)
    #[arg(long, default_value_t = 9)]
    sugars: i64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let predictor = SmartCorePredictor::load(&args.model)
        .with_context(|| format!("Failed to load model from {:?}", args.model))?;

    println!("Model:    {}", predictor.name());
    println!("Version:  {}", predictor.version());
    println!("Features: {}", predictor.feature_names().join(", "));

    let service = PredictionService::new(Arc::new(predictor), Metrics::new()?, true);
    let body = json!({"protein": args.protein, "fat": args.fat, "sugars": args.sugars});

    match service.handle(body.to_string().as_bytes()) {
        Ok(result) => {
            println!("Input:    {}", body);
            println!("Calories: {:.2} {}", result.calories(), result.currency());
            Ok(())
        }
        Err(e) => anyhow::bail!("Prediction for {} failed: {}", body, e),
    }
}
