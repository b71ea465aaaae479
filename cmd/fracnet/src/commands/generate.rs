//! Generate command implementation.

use anyhow::{Context, Result};
use fracnet_model::GenerationSettings;
use fracnet_realization::{directory_factory, run_batch, run_batch_parallel, RealizationDriver};
use std::path::Path;
use tracing::info;

/// Runs the generate command.
pub fn run(
    settings_path: &str,
    output: &str,
    seed: Option<u64>,
    realizations: Option<usize>,
    parallel: bool,
) -> Result<()> {
    let mut settings = GenerationSettings::load(settings_path)
        .with_context(|| format!("Failed to load settings: {settings_path}"))?;
    if let Some(seed) = seed {
        settings = settings.with_seed(seed);
    }
    if let Some(realizations) = realizations {
        settings = settings.with_realizations(realizations);
    }

    info!(
        "Generating {} realization(s) of {} fractures from seed {}",
        settings.realizations, settings.fracture_count, settings.seed
    );

    let driver = RealizationDriver::new(settings);
    let root = Path::new(output);
    let result = if parallel {
        run_batch_parallel(&driver, directory_factory(root))
    } else {
        run_batch(&driver, directory_factory(root))
    };

    for summary in result.summaries() {
        info!(
            "{}: {} fractures, {} interior ({:.1}%), fingerprint {:016x}",
            summary.destination,
            summary.total,
            summary.interior,
            summary.interior_fraction * 100.0,
            summary.fingerprint
        );
    }

    if !result.all_passed() {
        anyhow::bail!(
            "{} of {} realizations failed:\n  {}",
            result.failed(),
            result.outcomes.len(),
            result.failure_details().join("\n  ")
        );
    }

    info!("Wrote {} realization(s) to {}", result.succeeded(), root.display());
    Ok(())
}
