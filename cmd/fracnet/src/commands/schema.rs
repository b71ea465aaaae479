//! Schema command implementation.

use anyhow::{Context, Result};
use fracnet_model::RawSettings;
use std::fs;
use tracing::info;

/// Runs the schema command.
pub fn run(output: Option<&str>) -> Result<()> {
    let schema = schemars::schema_for!(RawSettings);
    let mut json = serde_json::to_string_pretty(&schema)?;
    json.push('\n');

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write schema: {path}"))?;
            info!("Schema written to: {}", path);
        }
        None => print!("{json}"),
    }
    Ok(())
}
