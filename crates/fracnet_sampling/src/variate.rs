//! Seeded uniform variates.
//!
//! Every random draw of a realization goes through one [`VariateSampler`],
//! so a realization is fully determined by its seed and the order of draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform and grid-snapped variates in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct VariateSampler {
    rng: ChaCha8Rng,
    seed: u64,
}

impl VariateSampler {
    /// Creates a sampler seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the sampler was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws one value in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws one value `k / intervals` with `k` uniform in `0..=intervals`.
    ///
    /// `intervals == 0` falls back to [`next_uniform`](Self::next_uniform).
    pub fn next_discretized(&mut self, intervals: u32) -> f64 {
        if intervals == 0 {
            return self.next_uniform();
        }
        let k = self.rng.gen_range(0..=intervals);
        f64::from(k) / f64::from(intervals)
    }

    /// Draws `n` values in `[0, 1)`.
    pub fn uniform(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.next_uniform()).collect()
    }

    /// Draws `n` grid-snapped values, see
    /// [`next_discretized`](Self::next_discretized).
    pub fn discretized(&mut self, n: usize, intervals: u32) -> Vec<f64> {
        (0..n).map(|_| self.next_discretized(intervals)).collect()
    }
}
