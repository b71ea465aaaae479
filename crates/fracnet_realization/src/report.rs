//! Realization reports.
//!
//! | File | Content |
//! |---|---|
//! | `radii.tsv` | `name, radius` for every fracture |
//! | `centers.tsv` | `name, x, y, z` for every fracture |
//! | `radii_interior.tsv` | `name, radius` for interior fractures |
//! | `results.json` | per-fracture poles plus network statistics |
//! | `perimeters.tsv` | sampled perimeters, when enabled |
//!
//! `results.json` is merged into any existing file: only the `fractures` and
//! `network` keys are replaced.

#![allow(clippy::cast_precision_loss)] // counts are far below 2^52

use fracnet_model::{Fracture, FractureSetModel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;
use xxhash_rust::xxh64::xxh64;

use crate::destination::OutputDestination;
use crate::error::{Error, Result};

/// Radius report for all fractures.
pub const RADII_REPORT: &str = "radii.tsv";
/// Center report for all fractures.
pub const CENTERS_REPORT: &str = "centers.tsv";
/// Radius report for interior fractures.
pub const INTERIOR_RADII_REPORT: &str = "radii_interior.tsv";
/// Structured results.
pub const RESULTS_REPORT: &str = "results.json";
/// Sampled perimeter polylines.
pub const PERIMETERS_REPORT: &str = "perimeters.tsv";

const FINGERPRINT_SEED: u64 = 0;

/// Per-fracture entry of `results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractureEntry {
    /// Unit pole of the fracture plane.
    #[serde(rename = "unit normal")]
    pub unit_normal: [f64; 3],
    /// Fracture center.
    pub center: [f64; 3],
    /// Characteristic radius.
    pub radius: f64,
}

impl From<&Fracture> for FractureEntry {
    fn from(fracture: &Fracture) -> Self {
        Self {
            unit_normal: (*fracture.normal()).into(),
            center: fracture.center().coords.into(),
            radius: fracture.radius(),
        }
    }
}

/// Network statistics stored under `network` in `results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Fractures in the reported model.
    #[serde(rename = "total count")]
    pub total_count: usize,
    /// Fractures inside the interior box.
    #[serde(rename = "interior count")]
    pub interior_count: usize,
    /// `interior count / total count`, 0 for an empty model.
    #[serde(rename = "interior fraction")]
    pub interior_fraction: f64,
    /// Seed of the realization.
    pub seed: u64,
    /// Fracture count per group.
    pub groups: BTreeMap<String, usize>,
}

impl NetworkSummary {
    /// Computes statistics for `model` and its interior subset.
    pub fn new(model: &FractureSetModel, interior: &FractureSetModel, seed: u64) -> Self {
        let total_count = model.len();
        let interior_count = interior.len();
        let interior_fraction = if total_count == 0 {
            0.0
        } else {
            interior_count as f64 / total_count as f64
        };
        Self {
            total_count,
            interior_count,
            interior_fraction,
            seed,
            groups: model
                .groups()
                .map(|g| (g.name().to_string(), g.len()))
                .collect(),
        }
    }
}

/// Reports of one realization, ready to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSet {
    reports: Vec<(String, String)>,
}

impl ReportSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a report, replacing one with the same name.
    pub fn push(&mut self, name: &str, contents: String) {
        if let Some(slot) = self.reports.iter_mut().find(|(n, _)| n == name) {
            slot.1 = contents;
        } else {
            self.reports.push((name.to_string(), contents));
        }
    }

    /// Looks up a report by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.reports
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    /// Report names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.reports.iter().map(|(n, _)| n.as_str())
    }

    /// xxh64 over every report name and body, in insertion order.
    pub fn fingerprint(&self) -> u64 {
        let mut buffer = Vec::new();
        for (name, contents) in &self.reports {
            buffer.extend_from_slice(name.as_bytes());
            buffer.push(0);
            buffer.extend_from_slice(contents.as_bytes());
            buffer.push(0);
        }
        xxh64(&buffer, FINGERPRINT_SEED)
    }

    /// Writes every report to `destination`.
    ///
    /// # Errors
    ///
    /// Returns the first write failure.
    pub fn emit(&self, destination: &mut dyn OutputDestination) -> Result<()> {
        for (name, contents) in &self.reports {
            destination.write_text(name, contents)?;
        }
        Ok(())
    }
}

pub(crate) fn tsv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new())
}

pub(crate) fn finish_tsv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::malformed("tsv", e.to_string()))
}

/// Renders `name<TAB>radius` lines.
///
/// # Errors
///
/// Returns an error if the TSV writer fails.
pub fn radius_report<'a>(fractures: impl IntoIterator<Item = &'a Fracture>) -> Result<String> {
    let mut writer = tsv_writer();
    for fracture in fractures {
        writer.write_record([fracture.name().to_string(), fracture.radius().to_string()])?;
    }
    finish_tsv(writer)
}

/// Renders `name<TAB>x<TAB>y<TAB>z` lines.
///
/// # Errors
///
/// Returns an error if the TSV writer fails.
pub fn center_report<'a>(fractures: impl IntoIterator<Item = &'a Fracture>) -> Result<String> {
    let mut writer = tsv_writer();
    for fracture in fractures {
        let c = fracture.center();
        writer.write_record([
            fracture.name().to_string(),
            c.x.to_string(),
            c.y.to_string(),
            c.z.to_string(),
        ])?;
    }
    finish_tsv(writer)
}

/// Builds `results.json`, keeping unrelated top-level keys of `existing`.
///
/// An existing file that is not a JSON object is replaced.
///
/// # Errors
///
/// Returns an error if `existing` is not valid JSON.
pub fn results_json(
    existing: Option<&str>,
    model: &FractureSetModel,
    summary: &NetworkSummary,
) -> Result<String> {
    let mut root = match existing.map(serde_json::from_str::<Value>).transpose()? {
        Some(Value::Object(map)) => map,
        Some(_) => {
            warn!("existing {RESULTS_REPORT} is not an object, replacing it");
            Map::new()
        }
        None => Map::new(),
    };

    let fractures: Map<String, Value> = model
        .fractures()
        .map(|f| Ok((f.name().to_string(), serde_json::to_value(FractureEntry::from(f))?)))
        .collect::<Result<_>>()?;

    root.insert("fractures".to_string(), Value::Object(fractures));
    root.insert("network".to_string(), serde_json::to_value(summary)?);

    let mut text = serde_json::to_string_pretty(&Value::Object(root))?;
    text.push('\n');
    Ok(text)
}

/// Reads the `fractures` section of a `results.json` body.
///
/// # Errors
///
/// Returns [`Error::MalformedReport`] if the section is missing or has the
/// wrong layout.
pub fn parse_fracture_entries(results: &str) -> Result<BTreeMap<String, FractureEntry>> {
    let mut root: Map<String, Value> = serde_json::from_str(results)?;
    let fractures = root
        .remove("fractures")
        .ok_or_else(|| Error::malformed(RESULTS_REPORT, "missing 'fractures'"))?;
    serde_json::from_value(fractures).map_err(|e| Error::malformed(RESULTS_REPORT, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fracnet_model::{fracture_name, Shape};
    use nalgebra::{Point3, Vector3};

    fn model() -> FractureSetModel {
        (0..3)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64;
                Fracture::new(
                    fracture_name(i),
                    Point3::new(x, 0.5, -1.0),
                    Vector3::new(0.0, 0.0, -1.0),
                    Shape::disc(1.0 + x),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn radius_report_lines() {
        let model = model();
        let report = radius_report(model.fractures()).unwrap();
        assert_eq!(
            report,
            "FRACTURE00000_S\t1\nFRACTURE00001_S\t2\nFRACTURE00002_S\t3\n"
        );
    }

    #[test]
    fn center_report_lines() {
        let model = model();
        let report = center_report(model.fractures()).unwrap();
        let first = report.lines().next().unwrap();
        assert_eq!(first, "FRACTURE00000_S\t0\t0.5\t-1");
    }

    #[test]
    fn results_json_preserves_foreign_keys() {
        let model = model();
        let summary = NetworkSummary::new(&model, &model, 42);
        let existing = r#"{"notes": "keep me", "fractures": {"OLD": {}}}"#;
        let text = results_json(Some(existing), &model, &summary).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["notes"], "keep me");
        assert!(value["fractures"].get("OLD").is_none());
        assert_eq!(value["fractures"]["FRACTURE00001_S"]["unit normal"][2], -1.0);
        assert_eq!(value["network"]["total count"], 3);
        assert_eq!(value["network"]["groups"]["FRACTURES"], 3);
    }

    #[test]
    fn results_json_rejects_invalid_existing_file() {
        let model = model();
        let summary = NetworkSummary::new(&model, &model, 1);
        assert!(results_json(Some("{not json"), &model, &summary).is_err());
    }

    #[test]
    fn fracture_entries_parse_back() {
        let model = model();
        let summary = NetworkSummary::new(&model, &FractureSetModel::new(), 7);
        let text = results_json(None, &model, &summary).unwrap();
        let entries = parse_fracture_entries(&text).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries["FRACTURE00002_S"].center, [2.0, 0.5, -1.0]);
        assert!((summary.interior_fraction).abs() < f64::EPSILON);
    }

    #[test]
    fn fingerprint_tracks_contents() {
        let mut a = ReportSet::new();
        a.push(RADII_REPORT, "x\t1\n".to_string());
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.push(RADII_REPORT, "x\t2\n".to_string());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(b.names().count(), 1);
    }
}
