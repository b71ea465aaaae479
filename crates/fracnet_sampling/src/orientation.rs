//! Fracture pole sampling.
//!
//! Poles are drawn uniformly on the unit sphere from two variates `u`, `v`:
//! azimuth `θ = 2πu` and polar angle `φ = acos(2v - 1)`, so `z = 2v - 1`.
//! Hemisphere sampling folds the sphere across the equator, which keeps the
//! density uniform over the target half. The fold is applied to `z` directly;
//! equatorial poles (`v = 0.5`) get a zero `z` carrying the hemisphere's sign.

use fracnet_model::Hemisphere;
use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::variate::VariateSampler;

/// Draws unit fracture normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationSampler {
    hemisphere: Hemisphere,
}

impl OrientationSampler {
    /// Creates a sampler folding poles into `hemisphere`.
    #[must_use]
    pub const fn new(hemisphere: Hemisphere) -> Self {
        Self { hemisphere }
    }

    /// Target hemisphere.
    pub const fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Draws `n` poles in the target hemisphere, with both variates
    /// discretized by `intervals`.
    pub fn sample(&self, variates: &mut VariateSampler, n: usize, intervals: u32) -> Vec<Vector3<f64>> {
        (0..n).map(|_| self.next(variates, intervals)).collect()
    }

    /// Draws one pole in the target hemisphere.
    pub fn next(&self, variates: &mut VariateSampler, intervals: u32) -> Vector3<f64> {
        let u = variates.next_discretized(intervals);
        let v = variates.next_discretized(intervals);
        let z = polar_cosine(v).abs();
        let z = match self.hemisphere {
            Hemisphere::Lower => -z,
            Hemisphere::Upper => z,
        };
        pole(azimuth(u), z)
    }

    /// Draws `n` continuous poles over the whole sphere.
    pub fn sample_full_sphere(variates: &mut VariateSampler, n: usize) -> Vec<Vector3<f64>> {
        (0..n).map(|_| Self::next_full_sphere(variates)).collect()
    }

    /// Draws one continuous pole over the whole sphere.
    pub fn next_full_sphere(variates: &mut VariateSampler) -> Vector3<f64> {
        let u = variates.next_uniform();
        let v = variates.next_uniform();
        pole(azimuth(u), polar_cosine(v))
    }
}

fn azimuth(u: f64) -> f64 {
    2.0 * PI * u
}

/// `cos φ` for `φ = acos(2v - 1)`.
fn polar_cosine(v: f64) -> f64 {
    2.0f64.mul_add(v, -1.0).clamp(-1.0, 1.0)
}

fn pole(theta: f64, z: f64) -> Vector3<f64> {
    let sin_phi = z.mul_add(-z, 1.0).max(0.0).sqrt();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vector3::new(sin_phi * cos_theta, sin_phi * sin_theta, z)
}
