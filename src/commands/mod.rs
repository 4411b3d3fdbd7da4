//! CLI subcommands

pub mod depth;
pub mod place;
pub mod preview;
pub mod validate;

use anyhow::{Context, Result};
use order_engine::oms::{DepthSnapshot, DepthUpdate, OrderDraft};
use order_engine::EngineConfig;
use serde::Serialize;
use std::fs;
use std::io::Read;
use tracing::info;

/// Config from `path`, or defaults plus environment overrides
pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::from_file(path)?;
            info!("Loaded configuration from: {}", path);
            Ok(config)
        }
        None => {
            info!("No config file given, using defaults");
            EngineConfig::from_env()
        }
    }
}

/// Read a JSON document from a file, or stdin when `path` is `-`
fn read_json_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    }
}

pub fn load_draft(path: &str) -> Result<OrderDraft> {
    let contents = read_json_source(path)?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse order draft from {}", path))
}

pub fn load_depth(path: &str) -> Result<DepthSnapshot> {
    let contents = read_json_source(path)?;
    let update: DepthUpdate =
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse depth from {}", path))?;
    Ok(DepthSnapshot::from_levels(update.seq, &update.bids, &update.asks))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
