//! Fracture placement.
//!
//! Two modes are supported:
//!
//! - **Independent**: every fracture gets a center in the center box and a
//!   pole in the configured hemisphere, both optionally snapped to a grid.
//! - **Rejection**: fractures are placed one at a time with continuous
//!   centers and full-sphere poles; a candidate is accepted only when its
//!   perimeter stays more than the minimum separation away from every
//!   fracture accepted so far. The polyline distance is reduced by the chord
//!   deviation of both perimeters, so the check holds for the exact curves
//!   and not just their samples.

use fracnet_model::{
    fracture_name, perimeter_distance, DomainBox, Fracture, GenerationSettings, Shape,
    DEFAULT_PERIMETER_POINTS,
};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::orientation::OrientationSampler;
use crate::variate::VariateSampler;

/// Attempts allowed per requested fracture in rejection mode.
pub const ATTEMPTS_PER_FRACTURE: usize = 300;

/// How fractures are positioned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlacementMode {
    /// Centers and poles drawn independently per fracture.
    Independent,
    /// Sequential placement with a minimum perimeter separation.
    Rejection {
        /// Required separation between perimeters.
        min_separation: f64,
    },
}

/// Positions fractures of given radii inside the center box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSampler {
    center_box: DomainBox,
    center_intervals: u32,
    pole_intervals: u32,
    orientation: OrientationSampler,
    mode: PlacementMode,
    perimeter_points: usize,
    polygon: bool,
}

impl PlacementSampler {
    /// Creates an independent-mode sampler over `center_box`.
    #[must_use]
    pub const fn new(center_box: DomainBox) -> Self {
        Self {
            center_box,
            center_intervals: 0,
            pole_intervals: 0,
            orientation: OrientationSampler::new(fracnet_model::Hemisphere::Lower),
            mode: PlacementMode::Independent,
            perimeter_points: DEFAULT_PERIMETER_POINTS,
            polygon: false,
        }
    }

    /// Creates a sampler configured from validated settings.
    #[must_use]
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        let mut sampler = Self::new(settings.domain.center_box())
            .with_intervals(settings.center_intervals, settings.pole_intervals)
            .with_orientation(OrientationSampler::new(settings.hemisphere))
            .with_perimeter_points(settings.effective_perimeter_points())
            .with_polygons(settings.polygon);
        if let Some(min_separation) = settings.min_separation {
            sampler = sampler.with_min_separation(min_separation);
        }
        sampler
    }

    /// Sets center and pole discretization.
    #[must_use]
    pub const fn with_intervals(mut self, center: u32, pole: u32) -> Self {
        self.center_intervals = center;
        self.pole_intervals = pole;
        self
    }

    /// Sets the orientation sampler used in independent mode.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: OrientationSampler) -> Self {
        self.orientation = orientation;
        self
    }

    /// Switches to rejection mode when `min_separation > 0`.
    #[must_use]
    pub fn with_min_separation(mut self, min_separation: f64) -> Self {
        self.mode = if min_separation > 0.0 {
            PlacementMode::Rejection { min_separation }
        } else {
            PlacementMode::Independent
        };
        self
    }

    /// Sets the perimeter sampling density (at least 3).
    #[must_use]
    pub fn with_perimeter_points(mut self, points: usize) -> Self {
        self.perimeter_points = points.max(3);
        self
    }

    /// Produces polygons instead of discs.
    #[must_use]
    pub const fn with_polygons(mut self, polygon: bool) -> Self {
        self.polygon = polygon;
        self
    }

    /// Placement mode in effect.
    pub const fn mode(&self) -> PlacementMode {
        self.mode
    }

    /// Places one fracture per radius, named by index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlacementExhausted`] when rejection mode uses up
    /// [`ATTEMPTS_PER_FRACTURE`] × `radii.len()` attempts.
    pub fn place(&self, variates: &mut VariateSampler, radii: &[f64]) -> Result<Vec<Fracture>> {
        match self.mode {
            PlacementMode::Independent => self.place_independent(variates, radii),
            PlacementMode::Rejection { min_separation } => {
                self.place_rejecting(variates, radii, min_separation)
            }
        }
    }

    fn shape(&self, radius: f64) -> Shape {
        if self.polygon {
            Shape::Polygon {
                radius,
                vertices: self.perimeter_points,
            }
        } else {
            Shape::disc(radius)
        }
    }

    fn center(&self, variates: &mut VariateSampler, intervals: u32) -> Point3<f64> {
        let mid = self.center_box.mid();
        let half = self.center_box.half_extents();
        let mut center = *mid;
        for axis in 0..3 {
            let u = variates.next_discretized(intervals);
            center[axis] += 2.0f64.mul_add(u, -1.0) * half[axis];
        }
        center
    }

    fn place_independent(
        &self,
        variates: &mut VariateSampler,
        radii: &[f64],
    ) -> Result<Vec<Fracture>> {
        let fractures = radii
            .iter()
            .enumerate()
            .map(|(index, &radius)| {
                let center = self.center(variates, self.center_intervals);
                let normal = self.orientation.next(variates, self.pole_intervals);
                Fracture::new(fracture_name(index), center, normal, self.shape(radius))
                    .map_err(Error::from)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = fractures.len(), "placed fractures independently");
        Ok(fractures)
    }

    fn place_rejecting(
        &self,
        variates: &mut VariateSampler,
        radii: &[f64],
        min_separation: f64,
    ) -> Result<Vec<Fracture>> {
        let requested = radii.len();
        let budget = ATTEMPTS_PER_FRACTURE.saturating_mul(requested);
        let mut accepted: Vec<Fracture> = Vec::with_capacity(requested);
        // Accepted perimeters with their chord deviation.
        let mut perimeters: Vec<(Vec<Point3<f64>>, f64)> = Vec::with_capacity(requested);
        let mut attempts = 0;

        for (index, &radius) in radii.iter().enumerate() {
            loop {
                if attempts >= budget {
                    return Err(Error::PlacementExhausted {
                        placed: accepted.len(),
                        requested,
                        attempts,
                    });
                }
                attempts += 1;

                let center = self.center(variates, 0);
                let normal: Vector3<f64> = OrientationSampler::next_full_sphere(variates);
                let candidate =
                    Fracture::new(fracture_name(index), center, normal, self.shape(radius))?;
                let perimeter = candidate.perimeter(self.perimeter_points);
                let deviation = candidate.chord_deviation(self.perimeter_points);

                let clear = perimeters.iter().all(|(other, other_deviation)| {
                    perimeter_distance(&perimeter, other) - deviation - other_deviation
                        > min_separation
                });
                if clear {
                    accepted.push(candidate);
                    perimeters.push((perimeter, deviation));
                    break;
                }
            }
        }

        info!(
            placed = accepted.len(),
            attempts, min_separation, "rejection placement complete"
        );
        Ok(accepted)
    }
}
