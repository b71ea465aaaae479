//! Fracture shapes and perimeter geometry.
//!
//! Every fracture is a planar surface described by a [`Shape`] together with
//! a center point and a unit normal. Perimeters are sampled as closed
//! polylines. [`perimeter_distance`] measures the closest approach between
//! two such polylines segment by segment, and [`Shape::chord_deviation`]
//! bounds how far the true curve strays from its polyline, so the pair gives
//! a lower bound on the distance between the exact perimeters.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Perimeter sample count used when settings leave it unspecified.
pub const DEFAULT_PERIMETER_POINTS: usize = 64;

/// Maximum cosine between a span vector and the normal.
const ORTHOGONALITY_TOLERANCE: f64 = 1e-3;

/// Squared segment length below which a segment is treated as a point.
const DEGENERATE_SEGMENT: f64 = 1e-24;

/// Planar fracture shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Circular disc.
    Disc {
        /// Disc radius.
        radius: f64,
    },
    /// Regular polygon inscribed in a disc of the given radius.
    Polygon {
        /// Circumscribed radius.
        radius: f64,
        /// Number of polygon vertices (at least 3).
        vertices: usize,
    },
    /// Ellipse with two semi-axis vectors lying in the fracture plane.
    Ellipse {
        /// First semi-axis.
        span1: Vector3<f64>,
        /// Second semi-axis.
        span2: Vector3<f64>,
    },
    /// Rectangle with two half-edge vectors lying in the fracture plane.
    Rectangle {
        /// First half-edge vector.
        span1: Vector3<f64>,
        /// Second half-edge vector.
        span2: Vector3<f64>,
    },
}

/// Shape discriminant without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// [`Shape::Disc`].
    Disc,
    /// [`Shape::Polygon`].
    Polygon,
    /// [`Shape::Ellipse`].
    Ellipse,
    /// [`Shape::Rectangle`].
    Rectangle,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disc => write!(f, "disc"),
            Self::Polygon => write!(f, "polygon"),
            Self::Ellipse => write!(f, "ellipse"),
            Self::Rectangle => write!(f, "rectangle"),
        }
    }
}

impl Shape {
    /// Creates a disc.
    #[must_use]
    pub const fn disc(radius: f64) -> Self {
        Self::Disc { radius }
    }

    /// Returns the discriminant of this shape.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Disc { .. } => ShapeKind::Disc,
            Self::Polygon { .. } => ShapeKind::Polygon,
            Self::Ellipse { .. } => ShapeKind::Ellipse,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }

    /// Returns the characteristic radius of the shape.
    ///
    /// Discs and polygons report their own radius. Ellipses and rectangles
    /// report the radius of the disc with the same area.
    #[must_use]
    pub fn radius(&self) -> f64 {
        match self {
            Self::Disc { radius } | Self::Polygon { radius, .. } => *radius,
            Self::Ellipse { span1, span2 } => (span1.norm() * span2.norm()).sqrt(),
            Self::Rectangle { span1, span2 } => (4.0 * span1.norm() * span2.norm() / PI).sqrt(),
        }
    }

    /// Checks the shape parameters against the plane defined by `normal`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-positive radii,
    /// degenerate polygons, zero-length spans or spans that leave the plane.
    pub fn validate(&self, normal: &Vector3<f64>) -> Result<()> {
        match self {
            Self::Disc { radius } => check_radius(*radius),
            Self::Polygon { radius, vertices } => {
                if *vertices < 3 {
                    return Err(Error::invalid(format!(
                        "polygon needs at least 3 vertices, got {vertices}"
                    )));
                }
                check_radius(*radius)
            }
            Self::Ellipse { span1, span2 } | Self::Rectangle { span1, span2 } => {
                check_span(span1, normal)?;
                check_span(span2, normal)
            }
        }
    }

    /// Samples the closed perimeter of the shape as a polyline.
    ///
    /// `points` is the sampling density; it is raised to at least 3. The
    /// last vertex is not repeated.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn perimeter(
        &self,
        center: &Point3<f64>,
        normal: &Vector3<f64>,
        points: usize,
    ) -> Vec<Point3<f64>> {
        let points = points.max(3);
        match self {
            Self::Disc { radius } => {
                let (e1, e2) = plane_basis(normal);
                ellipse_points(center, &(e1 * *radius), &(e2 * *radius), points)
            }
            Self::Polygon { radius, vertices } => {
                let (e1, e2) = plane_basis(normal);
                let corners = ellipse_points(center, &(e1 * *radius), &(e2 * *radius), *vertices);
                subdivide_closed(&corners, points.div_ceil(*vertices).max(1))
            }
            Self::Ellipse { span1, span2 } => ellipse_points(center, span1, span2, points),
            Self::Rectangle { span1, span2 } => {
                let corners = [
                    center + span1 + span2,
                    center - span1 + span2,
                    center - span1 - span2,
                    center + span1 - span2,
                ];
                subdivide_closed(&corners, points.div_ceil(4).max(1))
            }
        }
    }

    /// Largest distance between the exact perimeter and the polyline
    /// returned by [`Shape::perimeter`] for the same `points`.
    ///
    /// Polygons and rectangles are sampled along their straight edges, so
    /// their polylines are exact. Curved shapes lose at most the sagitta of
    /// one chord, taken over the longer semi-axis for ellipses.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn chord_deviation(&self, points: usize) -> f64 {
        let sagitta = 1.0 - (PI / points.max(3) as f64).cos();
        match self {
            Self::Disc { radius } => radius * sagitta,
            Self::Ellipse { span1, span2 } => span1.norm().max(span2.norm()) * sagitta,
            Self::Polygon { .. } | Self::Rectangle { .. } => 0.0,
        }
    }
}

fn check_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!("radius must be positive, got {radius}")))
    }
}

fn check_span(span: &Vector3<f64>, normal: &Vector3<f64>) -> Result<()> {
    let length = span.norm();
    if !length.is_finite() || length <= 0.0 {
        return Err(Error::invalid("span vector must be non-zero"));
    }
    let cosine = span.dot(normal).abs() / (length * normal.norm());
    if cosine > ORTHOGONALITY_TOLERANCE {
        return Err(Error::invalid(format!(
            "span vector is not orthogonal to the normal (cosine {cosine:.2e})"
        )));
    }
    Ok(())
}

/// Returns an orthonormal pair spanning the plane perpendicular to `normal`.
///
/// The pair is a deterministic function of the normal, so perimeters of the
/// same fracture always start at the same vertex.
#[must_use]
pub fn plane_basis(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let n = normal.normalize();
    let helper = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let e1 = n.cross(&helper).normalize();
    let e2 = n.cross(&e1);
    (e1, e2)
}

#[allow(clippy::cast_precision_loss)]
fn ellipse_points(
    center: &Point3<f64>,
    axis1: &Vector3<f64>,
    axis2: &Vector3<f64>,
    count: usize,
) -> Vec<Point3<f64>> {
    (0..count)
        .map(|k| {
            let t = 2.0 * PI * k as f64 / count as f64;
            center + axis1 * t.cos() + axis2 * t.sin()
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn subdivide_closed(corners: &[Point3<f64>], per_edge: usize) -> Vec<Point3<f64>> {
    let mut out = Vec::with_capacity(corners.len() * per_edge);
    for (i, start) in corners.iter().enumerate() {
        let end = corners[(i + 1) % corners.len()];
        for step in 0..per_edge {
            let t = step as f64 / per_edge as f64;
            out.push(start + (end - start) * t);
        }
    }
    out
}

/// Closest distance between segments `p0`–`p1` and `q0`–`q1`.
///
/// Zero-length segments are handled as points.
#[must_use]
pub fn segment_distance(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    q0: &Point3<f64>,
    q1: &Point3<f64>,
) -> f64 {
    let dp = p1 - p0;
    let dq = q1 - q0;
    let offset = p0 - q0;
    let len_p = dp.norm_squared();
    let len_q = dq.norm_squared();
    let q_offset = dq.dot(&offset);

    // Parameters of the closest points along each segment, in [0, 1].
    let (sp, sq) = if len_p <= DEGENERATE_SEGMENT && len_q <= DEGENERATE_SEGMENT {
        (0.0, 0.0)
    } else if len_p <= DEGENERATE_SEGMENT {
        (0.0, (q_offset / len_q).clamp(0.0, 1.0))
    } else {
        let p_offset = dp.dot(&offset);
        if len_q <= DEGENERATE_SEGMENT {
            ((-p_offset / len_p).clamp(0.0, 1.0), 0.0)
        } else {
            let dot_pq = dp.dot(&dq);
            let denom = len_p.mul_add(len_q, -(dot_pq * dot_pq));
            // Parallel segments: any point of p works, start from p0.
            let sp = if denom > DEGENERATE_SEGMENT {
                (dot_pq.mul_add(q_offset, -(p_offset * len_q)) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let sq = dot_pq.mul_add(sp, q_offset) / len_q;
            if sq < 0.0 {
                ((-p_offset / len_p).clamp(0.0, 1.0), 0.0)
            } else if sq > 1.0 {
                (((dot_pq - p_offset) / len_p).clamp(0.0, 1.0), 1.0)
            } else {
                (sp, sq)
            }
        }
    };

    nalgebra::distance(&(p0 + dp * sp), &(q0 + dq * sq))
}

/// Minimum distance between two closed polylines.
///
/// Every edge of `a`, including the one closing the loop, is measured
/// against every edge of `b`, so crossing perimeters report 0. Returns
/// `f64::INFINITY` if either polyline is empty.
#[must_use]
pub fn perimeter_distance(a: &[Point3<f64>], b: &[Point3<f64>]) -> f64 {
    closed_edges(a)
        .flat_map(|(p0, p1)| {
            closed_edges(b).map(move |(q0, q1)| segment_distance(p0, p1, q0, q1))
        })
        .fold(f64::INFINITY, f64::min)
}

fn closed_edges(polyline: &[Point3<f64>]) -> impl Iterator<Item = (&Point3<f64>, &Point3<f64>)> {
    polyline.iter().zip(polyline.iter().cycle().skip(1))
}
