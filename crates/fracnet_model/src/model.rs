//! Fracture network model.
//!
//! A [`FractureSetModel`] owns every fracture of one realization, grouped
//! into named [`FractureSet`]s. Fractures are validated on construction and
//! never mutated afterwards; filtering produces new models.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geometry::Shape;

/// Group assigned to fractures that do not name one.
pub const DEFAULT_GROUP: &str = "FRACTURES";

/// Allowed deviation of a normal from unit length.
pub const NORMAL_TOLERANCE: f64 = 1e-9;

/// Returns the canonical name of the fracture at `index`.
#[must_use]
pub fn fracture_name(index: usize) -> String {
    format!("FRACTURE{index:05}_S")
}

/// A planar fracture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fracture {
    name: String,
    center: Point3<f64>,
    normal: Vector3<f64>,
    shape: Shape,
    group: String,
}

impl Fracture {
    /// Creates a fracture in the default group.
    ///
    /// The normal is rescaled to unit length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the center or normal is not
    /// finite, the normal has zero length, or the shape is invalid for the
    /// fracture plane.
    pub fn new(
        name: impl Into<String>,
        center: Point3<f64>,
        normal: Vector3<f64>,
        shape: Shape,
    ) -> Result<Self> {
        let name = name.into();
        if !center.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::invalid(format!("fracture {name}: center is not finite")));
        }
        let length = normal.norm();
        if !length.is_finite() || length <= f64::EPSILON {
            return Err(Error::invalid(format!(
                "fracture {name}: normal must be a non-zero finite vector"
            )));
        }
        let normal = normal / length;
        shape.validate(&normal)?;

        Ok(Self {
            name,
            center,
            normal,
            shape,
            group: DEFAULT_GROUP.to_string(),
        })
    }

    /// Places the fracture in the named group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Fracture name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fracture center.
    pub const fn center(&self) -> &Point3<f64> {
        &self.center
    }

    /// Unit normal of the fracture plane.
    pub const fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Fracture shape.
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Name of the group the fracture belongs to.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Characteristic radius, see [`Shape::radius`].
    pub fn radius(&self) -> f64 {
        self.shape.radius()
    }

    /// Samples the fracture perimeter with the given density.
    pub fn perimeter(&self, points: usize) -> Vec<Point3<f64>> {
        self.shape.perimeter(&self.center, &self.normal, points)
    }

    /// Gap between the exact perimeter and [`Fracture::perimeter`], see
    /// [`Shape::chord_deviation`].
    pub fn chord_deviation(&self, points: usize) -> f64 {
        self.shape.chord_deviation(points)
    }
}

/// A named, insertion-ordered collection of fractures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FractureSet {
    name: String,
    fractures: Vec<Fracture>,
}

impl FractureSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fractures: Vec::new(),
        }
    }

    /// Set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of fractures.
    pub fn len(&self) -> usize {
        self.fractures.len()
    }

    /// Returns true if the set holds no fractures.
    pub fn is_empty(&self) -> bool {
        self.fractures.is_empty()
    }

    /// Returns an iterator over fractures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Fracture> {
        self.fractures.iter()
    }

    fn push(&mut self, fracture: Fracture) {
        self.fractures.push(fracture);
    }
}

/// Ordered mapping from group name to fracture set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FractureSetModel {
    groups: Vec<FractureSet>,
    index: HashMap<String, usize>,
}

impl FractureSetModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named group, creating an empty one if it does not exist.
    pub fn get_or_create(&mut self, name: &str) -> &FractureSet {
        let slot = self.slot(name);
        &self.groups[slot]
    }

    fn slot(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.index.get(name) {
            return slot;
        }
        let slot = self.groups.len();
        self.groups.push(FractureSet::new(name));
        self.index.insert(name.to_string(), slot);
        slot
    }

    /// Appends a fracture to the group it names.
    pub fn insert(&mut self, fracture: Fracture) {
        let slot = self.slot(fracture.group());
        self.groups[slot].push(fracture);
    }

    /// Looks up a group by name.
    pub fn group(&self, name: &str) -> Option<&FractureSet> {
        self.index.get(name).map(|&slot| &self.groups[slot])
    }

    /// Returns groups in first-insertion order.
    pub fn groups(&self) -> impl Iterator<Item = &FractureSet> {
        self.groups.iter()
    }

    /// Returns every fracture, group by group.
    pub fn fractures(&self) -> impl Iterator<Item = &Fracture> {
        self.groups.iter().flat_map(FractureSet::iter)
    }

    /// Total number of fractures across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(FractureSet::len).sum()
    }

    /// Returns true if the model holds no fractures.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(FractureSet::is_empty)
    }

    /// Number of groups, including empty ones.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl FromIterator<Fracture> for FractureSetModel {
    fn from_iter<I: IntoIterator<Item = Fracture>>(iter: I) -> Self {
        let mut model = Self::new();
        for fracture in iter {
            model.insert(fracture);
        }
        model
    }
}
