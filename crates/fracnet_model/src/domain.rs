//! Simulation domain: nested axis-aligned boxes around a common midpoint.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layer names of the six cube faces, in face order.
pub const FACE_LAYERS: [&str; 6] = ["LEFT", "RIGHT", "FRONT", "BACK", "BOTTOM", "TOP"];

/// Layer suffix used for the faces of the inner test box.
pub const INTERIOR_SUFFIX: &str = "_INT";

/// An axis-aligned box given by its midpoint and per-axis half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBox {
    mid: Point3<f64>,
    half_extents: Vector3<f64>,
}

impl DomainBox {
    /// Creates a cube with the given half-length.
    #[must_use]
    pub fn cube(mid: Point3<f64>, half_length: f64) -> Self {
        Self {
            mid,
            half_extents: Vector3::repeat(half_length),
        }
    }

    /// Shrinks the box along x and y by `factor`, leaving z untouched.
    ///
    /// Used to keep fractures near the lateral domain edges out of interior
    /// statistics without cutting the vertical extent.
    #[must_use]
    pub fn with_lateral_reduction(mut self, factor: f64) -> Self {
        self.half_extents.x *= factor;
        self.half_extents.y *= factor;
        self
    }

    /// Box midpoint.
    pub const fn mid(&self) -> &Point3<f64> {
        &self.mid
    }

    /// Half extent along each axis.
    pub const fn half_extents(&self) -> &Vector3<f64> {
        &self.half_extents
    }

    /// Returns true if `point` lies inside the box, boundary included.
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|axis| (point[axis] - self.mid[axis]).abs() <= self.half_extents[axis])
    }
}

/// One square face of a cube, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxFace {
    /// Layer the face is drawn on.
    pub layer: String,
    /// Corner points in winding order.
    pub corners: [Point3<f64>; 4],
}

/// Nested cubes defining the simulation domain.
///
/// `hl1` bounds the model, `hl2` bounds where fracture centers are drawn and
/// `hl3` bounds the interior used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainSpec {
    midpoint: Point3<f64>,
    hl1: f64,
    hl2: f64,
    hl3: f64,
}

impl DomainSpec {
    /// Creates a domain spec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless
    /// `hl1 >= hl2 >= hl3 >= 0` and all values are finite.
    pub fn new(midpoint: Point3<f64>, hl1: f64, hl2: f64, hl3: f64) -> Result<Self> {
        if !midpoint.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::invalid("domain midpoint must be finite"));
        }
        for (label, value) in [("HL1", hl1), ("HL2", hl2), ("HL3", hl3)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!(
                    "{label} must be a non-negative number, got {value}"
                )));
            }
        }
        if hl1 < hl2 {
            return Err(Error::invalid(format!("HL1 ({hl1}) must be >= HL2 ({hl2})")));
        }
        if hl2 < hl3 {
            return Err(Error::invalid(format!("HL2 ({hl2}) must be >= HL3 ({hl3})")));
        }
        Ok(Self {
            midpoint,
            hl1,
            hl2,
            hl3,
        })
    }

    /// Common midpoint of all boxes.
    pub const fn midpoint(&self) -> &Point3<f64> {
        &self.midpoint
    }

    /// Outer half-length.
    pub const fn hl1(&self) -> f64 {
        self.hl1
    }

    /// Center-generation half-length.
    pub const fn hl2(&self) -> f64 {
        self.hl2
    }

    /// Inner test half-length.
    pub const fn hl3(&self) -> f64 {
        self.hl3
    }

    /// Outer bounding box.
    pub fn outer_box(&self) -> DomainBox {
        DomainBox::cube(self.midpoint, self.hl1)
    }

    /// Box fracture centers are drawn from.
    pub fn center_box(&self) -> DomainBox {
        DomainBox::cube(self.midpoint, self.hl2)
    }

    /// Inner box used to classify interior fractures.
    pub fn inner_box(&self) -> DomainBox {
        DomainBox::cube(self.midpoint, self.hl3)
    }

    /// Returns the six faces of a cube with the given half-length centred on
    /// the domain midpoint. Layer names get `suffix` appended.
    pub fn faces(&self, half_length: f64, suffix: &str) -> Vec<BoxFace> {
        let mut faces = Vec::with_capacity(6);
        for (i, layer) in FACE_LAYERS.iter().enumerate() {
            let axis = i / 2;
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            let mut face_mid = self.midpoint;
            face_mid[axis] += sign * half_length;

            let (a, b) = match axis {
                0 => (1, 2),
                1 => (0, 2),
                _ => (0, 1),
            };
            let corner = |sa: f64, sb: f64| {
                let mut p = face_mid;
                p[a] += sa * half_length;
                p[b] += sb * half_length;
                p
            };
            faces.push(BoxFace {
                layer: format!("{layer}{suffix}"),
                corners: [
                    corner(1.0, 1.0),
                    corner(-1.0, 1.0),
                    corner(-1.0, -1.0),
                    corner(1.0, -1.0),
                ],
            });
        }
        faces
    }
}
