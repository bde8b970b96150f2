//! variant-matrix - prints every variant combination for a list of variant types
//!
//! Usage: `variant-matrix [PATH|-]`. Reads a JSON array of `{name, options}`
//! objects from PATH, or stdin when PATH is `-` or missing.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;
use storefront_variants::{definitions_from_value, generate_bounded, GenerationPolicy, VariantCombination};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Serialize)]
struct Matrix {
    count: usize,
    combinations: Vec<VariantCombination>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let policy = GenerationPolicy::from_env()?;
    let source = std::env::args().nth(1).unwrap_or_else(|| "-".to_string());
    let raw = read_input(&source)?;
    let value: serde_json::Value = serde_json::from_str(&raw).with_context(|| format!("parsing {source} as JSON"))?;

    let definitions = definitions_from_value(&value)?;
    let combinations = generate_bounded(&definitions, &policy)?;
    tracing::info!(types = definitions.len(), combinations = combinations.len(), limit = policy.max_combinations, "generated variant matrix");

    let matrix = Matrix { count: combinations.len(), combinations };
    println!("{}", serde_json::to_string_pretty(&matrix)?);
    Ok(())
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(source).with_context(|| format!("reading {source}"))
}
