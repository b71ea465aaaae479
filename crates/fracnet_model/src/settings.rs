//! Generation settings.
//!
//! Settings files use the key names of the historical settings record
//! (`"HL1"`, `"uniform size rmax"`, ...). They are deserialized into
//! [`RawSettings`] and validated into the typed [`GenerationSettings`]
//! before any sampling starts.
//!
//! ```json
//! {
//!   "HL1": 10.0, "HL2": 5.0, "HL3": 3.0, "HL3 cube": false,
//!   "N": 5, "rmin": 0.5, "rmax": 2.0, "exponent": -2.0,
//!   "uniform size rmax": false, "perimeter distance min": 0.0,
//!   "perimeter points": 0, "polygon": false,
//!   "center intervals": 0, "pole intervals": 0,
//!   "seed": 42, "realizations": 1
//! }
//! ```

use nalgebra::Point3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::domain::{DomainBox, DomainSpec};
use crate::error::{Error, Result};
use crate::geometry::DEFAULT_PERIMETER_POINTS;

/// Hemisphere that sampled fracture poles are folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    /// Poles with `z <= 0`.
    #[default]
    Lower,
    /// Poles with `z >= 0`.
    Upper,
}

/// Settings record as read from a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawSettings {
    /// Half-length of the outer box.
    #[serde(rename = "HL1")]
    pub hl1: f64,
    /// Half-length of the fracture center box.
    #[serde(rename = "HL2")]
    pub hl2: f64,
    /// Half-length of the inner test box.
    #[serde(rename = "HL3")]
    pub hl3: f64,
    /// Whether the inner test box is rendered.
    #[serde(rename = "HL3 cube", default)]
    pub hl3_cube: bool,
    /// Number of fractures.
    #[serde(rename = "N")]
    pub n: i64,
    /// Lower radius bound.
    pub rmin: f64,
    /// Upper radius bound.
    pub rmax: f64,
    /// Power-law exponent of the size distribution.
    pub exponent: f64,
    /// Give every fracture radius `rmax` instead of sampling.
    #[serde(rename = "uniform size rmax", default)]
    pub uniform_size_rmax: bool,
    /// Minimum perimeter separation; 0 disables rejection placement.
    #[serde(rename = "perimeter distance min", default)]
    pub perimeter_distance_min: f64,
    /// Perimeter sampling density; 0 selects the default.
    #[serde(rename = "perimeter points", default)]
    pub perimeter_points: i64,
    /// Represent fractures as polygons rather than smooth discs.
    #[serde(default)]
    pub polygon: bool,
    /// Center discretization granularity; 0 is continuous.
    #[serde(rename = "center intervals", default)]
    pub center_intervals: i64,
    /// Pole discretization granularity; 0 is continuous.
    #[serde(rename = "pole intervals", default)]
    pub pole_intervals: i64,
    /// Seed of the first realization.
    #[serde(default)]
    pub seed: u64,
    /// Number of realizations.
    #[serde(default = "default_realizations")]
    pub realizations: i64,
    /// Common midpoint of the domain boxes.
    #[serde(default)]
    pub midpoint: [f64; 3],
    /// Hemisphere for independent-mode poles.
    #[serde(default)]
    pub hemisphere: Hemisphere,
    /// Lateral reduction of the inner box for interior statistics.
    #[serde(rename = "interior reduce", default = "default_reduce")]
    pub interior_reduce: f64,
    /// Optional stricter box applied before rendering.
    #[serde(
        rename = "fracture box",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fracture_box: Option<RawFractureBox>,
    /// Write sampled perimeters alongside the reports.
    #[serde(rename = "export perimeters", default)]
    pub export_perimeters: bool,
}

/// Fracture box record as read from a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawFractureBox {
    /// Half-length of the box.
    #[serde(rename = "HL")]
    pub half_length: f64,
    /// Lateral reduction factor.
    #[serde(default = "default_reduce")]
    pub reduce: f64,
    /// Groups that are never pruned.
    #[serde(rename = "exempt groups", default)]
    pub exempt_groups: Vec<String>,
}

const fn default_realizations() -> i64 {
    1
}

const fn default_reduce() -> f64 {
    1.0
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            hl1: 10.0,
            hl2: 5.0,
            hl3: 3.0,
            hl3_cube: false,
            n: 5,
            rmin: 0.5,
            rmax: 2.0,
            exponent: -2.0,
            uniform_size_rmax: false,
            perimeter_distance_min: 0.0,
            perimeter_points: 0,
            polygon: false,
            center_intervals: 0,
            pole_intervals: 0,
            seed: 42,
            realizations: 1,
            midpoint: [0.0; 3],
            hemisphere: Hemisphere::Lower,
            interior_reduce: 1.0,
            fracture_box: None,
            export_perimeters: false,
        }
    }
}

/// Bounded power-law size distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeDistribution {
    /// Lower radius bound.
    pub rmin: f64,
    /// Upper radius bound.
    pub rmax: f64,
    /// Power-law exponent.
    pub exponent: f64,
    /// Skip sampling and use `rmax` for every fracture.
    pub uniform: bool,
}

/// Stricter box used to prune fractures before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractureBox {
    /// Half-length of the box.
    pub half_length: f64,
    /// Lateral reduction factor in `(0, 1]`.
    pub reduce: f64,
    /// Groups copied whole regardless of position.
    pub exempt_groups: Vec<String>,
}

/// Validated configuration for one realization (or a batch of them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Domain boxes.
    pub domain: DomainSpec,
    /// Whether the inner box is rendered.
    pub render_inner_box: bool,
    /// Number of fractures per realization.
    pub fracture_count: usize,
    /// Size distribution.
    pub size: SizeDistribution,
    /// Minimum perimeter separation; `None` selects independent placement.
    pub min_separation: Option<f64>,
    /// Perimeter sampling density as configured (0 = default).
    pub perimeter_points: usize,
    /// Represent fractures as polygons.
    pub polygon: bool,
    /// Center discretization granularity.
    pub center_intervals: u32,
    /// Pole discretization granularity.
    pub pole_intervals: u32,
    /// Seed of the first realization.
    pub seed: u64,
    /// Number of realizations.
    pub realizations: usize,
    /// Hemisphere for independent-mode poles.
    pub hemisphere: Hemisphere,
    /// Lateral reduction of the inner box.
    pub interior_reduce: f64,
    /// Optional pruning box.
    pub fracture_box: Option<FractureBox>,
    /// Write sampled perimeters alongside the reports.
    pub export_perimeters: bool,
}

impl RawSettings {
    /// Validates the record into [`GenerationSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<GenerationSettings> {
        let domain = DomainSpec::new(
            Point3::from(self.midpoint),
            self.hl1,
            self.hl2,
            self.hl3,
        )?;

        let fracture_count = usize::try_from(self.n)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| Error::invalid(format!("N must be positive, got {}", self.n)))?;

        for (label, value) in [
            ("rmin", self.rmin),
            ("rmax", self.rmax),
            ("exponent", self.exponent),
        ] {
            if !value.is_finite() {
                return Err(Error::invalid(format!("{label} must be finite, got {value}")));
            }
        }
        if self.rmin <= 0.0 {
            return Err(Error::invalid(format!(
                "rmin must be positive, got {}",
                self.rmin
            )));
        }
        if self.rmin > self.rmax {
            return Err(Error::invalid(format!(
                "rmin ({}) must not exceed rmax ({})",
                self.rmin, self.rmax
            )));
        }
        if !self.uniform_size_rmax && (self.exponent + 1.0).abs() < f64::EPSILON {
            return Err(Error::invalid(
                "exponent -1 is singular for the power-law size distribution",
            ));
        }

        if !self.perimeter_distance_min.is_finite() || self.perimeter_distance_min < 0.0 {
            return Err(Error::invalid(format!(
                "perimeter distance min must be non-negative, got {}",
                self.perimeter_distance_min
            )));
        }
        let min_separation =
            (self.perimeter_distance_min > 0.0).then_some(self.perimeter_distance_min);

        let perimeter_points = usize::try_from(self.perimeter_points).map_err(|_| {
            Error::invalid(format!(
                "perimeter points must be non-negative, got {}",
                self.perimeter_points
            ))
        })?;
        if (1..3).contains(&perimeter_points) {
            return Err(Error::invalid(format!(
                "perimeter points must be 0 or at least 3, got {perimeter_points}"
            )));
        }

        let center_intervals = interval_count("center intervals", self.center_intervals)?;
        let pole_intervals = interval_count("pole intervals", self.pole_intervals)?;

        let realizations = usize::try_from(self.realizations)
            .ok()
            .filter(|&r| r >= 1)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "realizations must be at least 1, got {}",
                    self.realizations
                ))
            })?;

        check_reduce("interior reduce", self.interior_reduce)?;

        let fracture_box = self
            .fracture_box
            .as_ref()
            .map(|raw| {
                if !raw.half_length.is_finite() || raw.half_length < 0.0 {
                    return Err(Error::invalid(format!(
                        "fracture box HL must be non-negative, got {}",
                        raw.half_length
                    )));
                }
                check_reduce("fracture box reduce", raw.reduce)?;
                Ok(FractureBox {
                    half_length: raw.half_length,
                    reduce: raw.reduce,
                    exempt_groups: raw.exempt_groups.clone(),
                })
            })
            .transpose()?;

        let settings = GenerationSettings {
            domain,
            render_inner_box: self.hl3_cube,
            fracture_count,
            size: SizeDistribution {
                rmin: self.rmin,
                rmax: self.rmax,
                exponent: self.exponent,
                uniform: self.uniform_size_rmax,
            },
            min_separation,
            perimeter_points,
            polygon: self.polygon,
            center_intervals,
            pole_intervals,
            seed: self.seed,
            realizations,
            hemisphere: self.hemisphere,
            interior_reduce: self.interior_reduce,
            fracture_box,
            export_perimeters: self.export_perimeters,
        };
        debug!(
            fractures = settings.fracture_count,
            realizations = settings.realizations,
            rejection = settings.min_separation.is_some(),
            "validated settings"
        );
        Ok(settings)
    }
}

fn interval_count(label: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::invalid(format!("{label} must be a non-negative count, got {value}")))
}

fn check_reduce(label: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!("{label} must be in (0, 1], got {value}")))
    }
}

impl GenerationSettings {
    /// Parses and validates settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<RawSettings>(json)?.validate()
    }

    /// Parses and validates settings from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str::<RawSettings>(yaml)?.validate()
    }

    /// Loads settings from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml" | "yml") => Self::from_yaml(&content),
            other => Err(Error::UnknownFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other.unwrap_or("")
            ))),
        }
    }

    /// Returns a copy with a different first seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns a copy with a different realization count.
    #[must_use]
    pub fn with_realizations(mut self, realizations: usize) -> Self {
        self.realizations = realizations.max(1);
        self
    }

    /// Perimeter sampling density, with 0 replaced by the default.
    pub const fn effective_perimeter_points(&self) -> usize {
        if self.perimeter_points == 0 {
            DEFAULT_PERIMETER_POINTS
        } else {
            self.perimeter_points
        }
    }

    /// Inner box used for interior statistics.
    pub fn interior_box(&self) -> DomainBox {
        self.domain
            .inner_box()
            .with_lateral_reduction(self.interior_reduce)
    }

    /// Pruning box, if one is configured.
    pub fn pruning_box(&self) -> Option<DomainBox> {
        self.fracture_box.as_ref().map(|fb| {
            DomainBox::cube(*self.domain.midpoint(), fb.half_length)
                .with_lateral_reduction(fb.reduce)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "HL1": 10, "HL2": 5, "HL3": 3, "HL3 cube": false,
        "N": 5, "rmin": 0.5, "rmax": 2.0, "exponent": -2.0,
        "uniform size rmax": false, "perimeter distance min": 0,
        "perimeter points": 0, "polygon": false,
        "center intervals": 0, "pole intervals": 0,
        "seed": 42, "realizations": 1
    }"#;

    fn raw() -> RawSettings {
        serde_json::from_str(SCENARIO).unwrap()
    }

    #[test]
    fn parses_historical_keys() {
        let settings = GenerationSettings::from_json(SCENARIO).unwrap();
        assert_eq!(settings.fracture_count, 5);
        assert_eq!(settings.seed, 42);
        assert!(settings.min_separation.is_none());
        assert_eq!(settings.hemisphere, Hemisphere::Lower);
        assert_eq!(settings.effective_perimeter_points(), DEFAULT_PERIMETER_POINTS);
        assert!((settings.domain.hl2() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_yaml() {
        let yaml = "HL1: 4\nHL2: 2\nHL3: 1\nN: 3\nrmin: 0.1\nrmax: 0.2\nexponent: -2.5\nhemisphere: upper\n";
        let settings = GenerationSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.fracture_count, 3);
        assert_eq!(settings.hemisphere, Hemisphere::Upper);
        assert_eq!(settings.realizations, 1);
    }

    #[test]
    fn rejects_inverted_radius_bounds() {
        let mut raw = raw();
        raw.rmin = 3.0;
        assert!(matches!(raw.validate(), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_non_positive_count() {
        let mut raw = raw();
        raw.n = 0;
        assert!(raw.validate().is_err());
        raw.n = -4;
        assert!(raw.validate().is_err());
    }

    #[test]
    fn rejects_singular_exponent_only_in_power_law_mode() {
        let mut raw = raw();
        raw.exponent = -1.0;
        assert!(raw.validate().is_err());
        raw.uniform_size_rmax = true;
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn rejects_negative_intervals() {
        let mut raw = raw();
        raw.center_intervals = -1;
        assert!(raw.validate().is_err());

        let mut raw = self::raw();
        raw.pole_intervals = -3;
        assert!(raw.validate().is_err());
    }

    #[test]
    fn rejects_unnested_boxes() {
        let mut raw = raw();
        raw.hl2 = 12.0;
        assert!(raw.validate().is_err());

        let mut raw = self::raw();
        raw.hl3 = 6.0;
        assert!(raw.validate().is_err());
    }

    #[test]
    fn rejects_zero_radius_and_bad_reduce() {
        let mut raw = raw();
        raw.rmin = 0.0;
        assert!(raw.validate().is_err());

        let mut raw = self::raw();
        raw.interior_reduce = 1.5;
        assert!(raw.validate().is_err());

        let mut raw = self::raw();
        raw.perimeter_points = 2;
        assert!(raw.validate().is_err());
    }

    #[test]
    fn positive_separation_selects_rejection_mode() {
        let mut raw = raw();
        raw.perimeter_distance_min = 0.25;
        let settings = raw.validate().unwrap();
        assert_eq!(settings.min_separation, Some(0.25));
    }

    #[test]
    fn fracture_box_builds_reduced_pruning_box() {
        let mut raw = raw();
        raw.fracture_box = Some(RawFractureBox {
            half_length: 4.0,
            reduce: 0.5,
            exempt_groups: vec!["WELLS".to_string()],
        });
        let settings = raw.validate().unwrap();
        let pruning = settings.pruning_box().unwrap();
        assert!((pruning.half_extents().x - 2.0).abs() < f64::EPSILON);
        assert!((pruning.half_extents().z - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_record_round_trips_through_json() {
        let json = serde_json::to_string_pretty(&RawSettings::default()).unwrap();
        assert!(json.contains("\"uniform size rmax\""));
        assert!(GenerationSettings::from_json(&json).is_ok());
    }
}
