//! Ingest command implementation.

use anyhow::{Context, Result};
use fracnet_model::{read_fracture_list, GenerationSettings, ShapePolicy};
use fracnet_realization::{DirectoryDestination, RealizationDriver};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

/// Runs the ingest command.
pub fn run(list_path: &str, settings_path: &str, output: &str, lenient: bool) -> Result<()> {
    let settings = GenerationSettings::load(settings_path)
        .with_context(|| format!("Failed to load settings: {settings_path}"))?;

    let policy = if lenient {
        ShapePolicy::Lenient
    } else {
        ShapePolicy::Strict
    };
    let file = File::open(list_path)
        .with_context(|| format!("Failed to open fracture list: {list_path}"))?;
    let model = read_fracture_list(BufReader::new(file), policy)
        .with_context(|| format!("Failed to parse fracture list: {list_path}"))?;

    info!(
        "Loaded {} fractures in {} groups from {}",
        model.len(),
        model.group_count(),
        list_path
    );

    let seed = settings.seed;
    let driver = RealizationDriver::new(settings).with_fracture_list(model);
    let mut destination = DirectoryDestination::new(output);
    let summary = driver
        .run(seed, &mut destination)
        .with_context(|| format!("Failed to write reports to {output}"))?;

    info!(
        "{} fractures reported, {} interior, written to {}",
        summary.total, summary.interior, output
    );
    Ok(())
}
