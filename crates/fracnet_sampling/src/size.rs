//! Fracture size sampling from a bounded power law.

use fracnet_model::SizeDistribution;
use tracing::debug;

use crate::error::{Error, Result};
use crate::variate::VariateSampler;

/// Draws fracture radii from a [`SizeDistribution`].
///
/// In power-law mode the radius is obtained by inverting the CDF of
/// `p(r) ∝ r^e` on `[rmin, rmax]`:
///
/// ```text
/// r = ((rmax^(e+1) - rmin^(e+1)) * y + rmin^(e+1))^(1/(e+1))
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeSampler {
    distribution: SizeDistribution,
}

impl SizeSampler {
    /// Creates a sampler for `distribution`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-positive or inverted
    /// bounds, and for `exponent == -1` unless uniform mode is set.
    pub fn new(distribution: SizeDistribution) -> Result<Self> {
        let SizeDistribution {
            rmin,
            rmax,
            exponent,
            uniform,
        } = distribution;
        if !(rmin.is_finite() && rmax.is_finite() && exponent.is_finite()) {
            return Err(Error::invalid("size distribution values must be finite"));
        }
        if rmin <= 0.0 || rmin > rmax {
            return Err(Error::invalid(format!(
                "radius bounds must satisfy 0 < rmin <= rmax, got [{rmin}, {rmax}]"
            )));
        }
        if !uniform && (exponent + 1.0).abs() < f64::EPSILON {
            return Err(Error::invalid("exponent -1 is singular"));
        }
        Ok(Self { distribution })
    }

    /// Convenience constructor for a power-law distribution.
    ///
    /// # Errors
    ///
    /// See [`SizeSampler::new`].
    pub fn power_law(rmin: f64, rmax: f64, exponent: f64) -> Result<Self> {
        Self::new(SizeDistribution {
            rmin,
            rmax,
            exponent,
            uniform: false,
        })
    }

    /// The distribution being sampled.
    pub const fn distribution(&self) -> &SizeDistribution {
        &self.distribution
    }

    /// Draws `n` radii.
    ///
    /// Uniform mode returns `rmax` without consuming variates.
    pub fn sample(&self, variates: &mut VariateSampler, n: usize) -> Vec<f64> {
        let SizeDistribution {
            rmin,
            rmax,
            exponent,
            uniform,
        } = self.distribution;

        if uniform {
            return vec![rmax; n];
        }

        let power = exponent + 1.0;
        let low = rmin.powf(power);
        let high = rmax.powf(power);
        let radii: Vec<f64> = (0..n)
            .map(|_| {
                let y = variates.next_uniform();
                ((high - low).mul_add(y, low))
                    .powf(power.recip())
                    .clamp(rmin, rmax)
            })
            .collect();

        debug!(count = n, rmin, rmax, exponent, "sampled radii");
        radii
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_singular_exponent() {
        assert!(matches!(
            SizeSampler::power_law(0.5, 2.0, -1.0),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(SizeSampler::power_law(3.0, 2.0, -2.0).is_err());
        assert!(SizeSampler::power_law(0.0, 2.0, -2.0).is_err());
    }

    #[test]
    fn uniform_mode_returns_rmax_without_drawing() {
        let sampler = SizeSampler::new(SizeDistribution {
            rmin: 0.5,
            rmax: 2.0,
            exponent: -1.0,
            uniform: true,
        })
        .unwrap();

        let mut variates = VariateSampler::new(1);
        let mut untouched = VariateSampler::new(1);
        assert_eq!(sampler.sample(&mut variates, 4), vec![2.0; 4]);
        assert_eq!(variates.next_uniform(), untouched.next_uniform());
    }

    #[test]
    fn steep_power_law_favours_small_radii() {
        let sampler = SizeSampler::power_law(1.0, 100.0, -3.0).unwrap();
        let radii = sampler.sample(&mut VariateSampler::new(5), 2000);
        let small = radii.iter().filter(|&&r| r < 2.0).count();
        assert!(small > 1000, "only {small} of 2000 radii below 2");
    }

    #[test]
    fn equal_bounds_give_constant_radius() {
        let sampler = SizeSampler::power_law(1.5, 1.5, -2.5).unwrap();
        let radii = sampler.sample(&mut VariateSampler::new(9), 10);
        assert!(radii.iter().all(|&r| (r - 1.5).abs() < 1e-12));
    }

    proptest! {
        #[test]
        fn radii_stay_within_bounds(
            seed in any::<u64>(),
            rmin in 0.01f64..5.0,
            span in 0.0f64..10.0,
            exponent in -4.0f64..2.0,
        ) {
            prop_assume!((exponent + 1.0).abs() > 1e-3);
            let rmax = rmin + span;
            let sampler = SizeSampler::power_law(rmin, rmax, exponent).unwrap();
            let radii = sampler.sample(&mut VariateSampler::new(seed), 50);
            prop_assert_eq!(radii.len(), 50);
            for r in radii {
                prop_assert!(r >= rmin && r <= rmax, "{} outside [{}, {}]", r, rmin, rmax);
            }
        }
    }
}
