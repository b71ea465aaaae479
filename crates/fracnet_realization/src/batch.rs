//! Multi-realization batches.
//!
//! Realization `i` runs with seed `seed + i` (wrapping) and writes to its own
//! destination, produced by a caller-supplied factory. Realizations share
//! nothing else, so the sequential and parallel runners produce identical
//! reports.

use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::destination::{DirectoryDestination, OutputDestination};
use crate::driver::{RealizationDriver, RealizationSummary};
use crate::error::Result;

/// Seed of realization `index` in a batch starting at `base`.
pub const fn realization_seed(base: u64, index: usize) -> u64 {
    base.wrapping_add(index as u64)
}

/// Directory name of realization `index` inside a batch directory.
pub fn realization_dir_name(index: usize) -> String {
    format!("realization_{index:05}")
}

/// Destination factory writing realization `i` to `root/realization_{i:05}`.
pub fn directory_factory(root: &Path) -> impl Fn(usize) -> Result<DirectoryDestination> + Sync + '_ {
    move |index| Ok(DirectoryDestination::new(root.join(realization_dir_name(index))))
}

/// Lists realization directories under `root` in index order.
///
/// # Errors
///
/// Returns an error if `root` cannot be read.
pub fn batch_destinations(root: &Path) -> Result<Vec<DirectoryDestination>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name();
        let is_realization = name
            .to_str()
            .is_some_and(|n| n.starts_with("realization_"));
        if is_realization && entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs.into_iter().map(DirectoryDestination::new).collect())
}

/// Result of one realization inside a batch.
#[derive(Debug)]
pub struct RealizationOutcome {
    /// Position in the batch.
    pub index: usize,
    /// Seed used.
    pub seed: u64,
    /// Summary, or the error that ended the realization.
    pub result: Result<RealizationSummary>,
}

/// Results of a batch.
#[derive(Debug)]
pub struct BatchResult {
    /// Per-realization outcomes in index order.
    pub outcomes: Vec<RealizationOutcome>,
}

impl BatchResult {
    /// Number of realizations that completed.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of realizations that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether every realization completed.
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Summaries of the completed realizations.
    pub fn summaries(&self) -> impl Iterator<Item = &RealizationSummary> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failure messages of the failed realizations.
    pub fn failure_details(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.result
                    .as_ref()
                    .err()
                    .map(|e| format!("realization {} (seed {}): {e}", o.index, o.seed))
            })
            .collect()
    }
}

fn run_one<D, F>(driver: &RealizationDriver, index: usize, factory: &F) -> RealizationOutcome
where
    D: OutputDestination,
    F: Fn(usize) -> Result<D>,
{
    let seed = realization_seed(driver.settings().seed, index);
    let result = factory(index).and_then(|mut destination| driver.run(seed, &mut destination));
    if let Err(e) = &result {
        warn!(index, seed, error = %e, "realization failed");
    }
    RealizationOutcome {
        index,
        seed,
        result,
    }
}

fn finish(outcomes: Vec<RealizationOutcome>) -> BatchResult {
    let result = BatchResult { outcomes };
    info!(
        realizations = result.outcomes.len(),
        succeeded = result.succeeded(),
        failed = result.failed(),
        "batch complete"
    );
    result
}

/// Runs `settings.realizations` realizations one after another.
pub fn run_batch<D, F>(driver: &RealizationDriver, factory: F) -> BatchResult
where
    D: OutputDestination,
    F: Fn(usize) -> Result<D>,
{
    let count = driver.settings().realizations;
    finish((0..count).map(|i| run_one(driver, i, &factory)).collect())
}

/// Runs `settings.realizations` realizations on the rayon thread pool.
pub fn run_batch_parallel<D, F>(driver: &RealizationDriver, factory: F) -> BatchResult
where
    D: OutputDestination,
    F: Fn(usize) -> Result<D> + Sync,
{
    let count = driver.settings().realizations;
    finish(
        (0..count)
            .into_par_iter()
            .map(|i| run_one(driver, i, &factory))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::MemoryDestination;
    use fracnet_model::RawSettings;

    fn driver(realizations: i64) -> RealizationDriver {
        let mut raw = RawSettings::default();
        raw.realizations = realizations;
        RealizationDriver::new(raw.validate().unwrap())
    }

    #[test]
    fn seeds_wrap() {
        assert_eq!(realization_seed(40, 2), 42);
        assert_eq!(realization_seed(u64::MAX, 1), 0);
    }

    #[test]
    fn dir_names_are_zero_padded() {
        assert_eq!(realization_dir_name(3), "realization_00003");
    }

    #[test]
    fn batch_uses_consecutive_seeds() {
        let result = run_batch(&driver(3), |i| Ok(MemoryDestination::new(format!("r{i}"))));
        assert!(result.all_passed());
        let seeds: Vec<_> = result.summaries().map(|s| s.seed).collect();
        assert_eq!(seeds, [42, 43, 44]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let driver = driver(6);
        let factory = |i: usize| -> Result<MemoryDestination> {
            Ok(MemoryDestination::new(format!("r{i}")))
        };
        let sequential = run_batch(&driver, factory);
        let parallel = run_batch_parallel(&driver, factory);

        let a: Vec<_> = sequential.summaries().map(|s| s.fingerprint).collect();
        let b: Vec<_> = parallel.summaries().map(|s| s.fingerprint).collect();
        assert_eq!(a.len(), 6);
        assert_eq!(a, b);
    }

    #[test]
    fn factory_failures_are_per_realization() {
        let result = run_batch(&driver(3), |i| {
            if i == 1 {
                Err(crate::Error::malformed("dest", "refused"))
            } else {
                Ok(MemoryDestination::default())
            }
        });
        assert_eq!(result.succeeded(), 2);
        assert_eq!(result.failed(), 1);
        assert!(result.failure_details()[0].contains("seed 43"));
    }

    #[test]
    fn exhausted_placement_fails_only_its_realization() {
        // Two near-concentric discs: placement succeeds only when the sampled
        // radii differ by more than the separation, which depends on the seed.
        let raw = RawSettings {
            hl2: 0.01,
            hl3: 0.01,
            n: 2,
            rmin: 0.1,
            rmax: 4.1,
            exponent: 0.0,
            perimeter_distance_min: 1.5,
            perimeter_points: 32,
            realizations: 24,
            ..RawSettings::default()
        };
        let driver = RealizationDriver::new(raw.validate().unwrap());

        let result = run_batch(&driver, |i| Ok(MemoryDestination::new(format!("r{i}"))));
        assert_eq!(result.outcomes.len(), 24);
        assert!(result.succeeded() > 0);
        assert!(result.failed() > 0);

        for outcome in &result.outcomes {
            match &outcome.result {
                Ok(summary) => {
                    assert_eq!(summary.total, 2);
                    let standalone = driver
                        .run(outcome.seed, &mut MemoryDestination::default())
                        .unwrap();
                    assert_eq!(summary.fingerprint, standalone.fingerprint);
                }
                Err(crate::Error::Sampling(fracnet_sampling::Error::PlacementExhausted {
                    placed,
                    requested,
                    attempts,
                })) => {
                    assert_eq!((*placed, *requested, *attempts), (1, 2, 600));
                }
                Err(other) => panic!("realization {}: {other}", outcome.index),
            }
        }

        let first_failure = result.outcomes.iter().position(|o| o.result.is_err());
        let last_success = result.outcomes.iter().rposition(|o| o.result.is_ok());
        assert!(first_failure < last_success, "no realization succeeded after a failure");
        assert_eq!(result.failure_details().len(), result.failed());
    }
}
