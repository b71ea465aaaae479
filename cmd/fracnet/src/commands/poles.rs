//! Poles command implementation.

use anyhow::{Context, Result};
use fracnet_realization::{batch_destinations, collect_poles, poles_report, POLES_REPORT};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runs the poles command.
pub fn run(batch: &str, output: Option<&str>) -> Result<()> {
    let root = Path::new(batch);
    let destinations = batch_destinations(root)
        .with_context(|| format!("Failed to read batch directory: {batch}"))?;
    if destinations.is_empty() {
        anyhow::bail!("No realization directories found in {batch}");
    }

    let poles = collect_poles(&destinations).with_context(|| "Failed to collect poles")?;
    let report = poles_report(&poles)?;

    let output_path = output.map_or_else(|| root.join(POLES_REPORT), PathBuf::from);
    fs::write(&output_path, report)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!(
        "Collected {} poles from {} realizations into {}",
        poles.len(),
        destinations.len(),
        output_path.display()
    );
    Ok(())
}
