//! Fracture list parser.
//!
//! A fracture list is tab-separated text, one fracture per line:
//!
//! ```text
//! [group]  shape  cx cy cz  nx ny nz  s1x s1y s1z  s2x s2y s2z
//! ```
//!
//! The group column is optional. Lines whose first field is `data-set` are
//! headers and blank lines are ignored.

use nalgebra::{Point3, Vector3};
use std::io::Read;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geometry::Shape;
use crate::model::{fracture_name, Fracture, FractureSetModel, DEFAULT_GROUP};

/// First field of a header line.
pub const HEADER_SENTINEL: &str = "data-set";

/// Number of numeric fields in a record.
const NUMERIC_FIELDS: usize = 12;

/// Relative tolerance under which an ellipse is treated as a disc.
const CIRCULAR_TOLERANCE: f64 = 1e-9;

/// How unrecognized shape tokens are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapePolicy {
    /// Reject the list with [`Error::UnknownShape`].
    #[default]
    Strict,
    /// Treat the record as a rectangle and log a warning.
    Lenient,
}

/// Parses a fracture list held in memory.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] for records with the wrong field count
/// or unparsable numbers, and [`Error::UnknownShape`] under
/// [`ShapePolicy::Strict`].
pub fn parse_fracture_list(input: &str, policy: ShapePolicy) -> Result<FractureSetModel> {
    read_fracture_list(input.as_bytes(), policy)
}

/// Parses a fracture list from a reader.
///
/// Fractures are named by their position among data records.
///
/// # Errors
///
/// See [`parse_fracture_list`]; I/O failures surface as [`Error::Csv`].
pub fn read_fracture_list<R: Read>(reader: R, policy: ShapePolicy) -> Result<FractureSetModel> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut model = FractureSetModel::new();
    let mut index = 0;

    for record in csv_reader.records() {
        let record = record?;
        let line = record
            .position()
            .map_or(index + 1, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.get(0) == Some(HEADER_SENTINEL) {
            debug!(line, "skipping header");
            continue;
        }

        let fields: Vec<&str> = record.iter().collect();
        let (group, token, numbers) = match fields.len() {
            13 => (DEFAULT_GROUP, fields[0], &fields[1..]),
            14 => {
                let group = if fields[0].is_empty() {
                    DEFAULT_GROUP
                } else {
                    fields[0]
                };
                (group, fields[1], &fields[2..])
            }
            n => {
                return Err(Error::malformed(
                    line,
                    format!("expected 13 or 14 fields, found {n}"),
                ))
            }
        };

        let values = parse_numbers(line, numbers)?;
        let center = Point3::new(values[0], values[1], values[2]);
        let normal = Vector3::new(values[3], values[4], values[5]);
        let span1 = Vector3::new(values[6], values[7], values[8]);
        let span2 = Vector3::new(values[9], values[10], values[11]);

        let shape = shape_for(line, token, span1, span2, policy)?;
        let fracture = Fracture::new(fracture_name(index), center, normal, shape)
            .map_err(|e| Error::malformed(line, e.to_string()))?
            .with_group(group);
        model.insert(fracture);
        index += 1;
    }

    debug!(
        fractures = model.len(),
        groups = model.group_count(),
        "parsed fracture list"
    );
    Ok(model)
}

fn parse_numbers(line: usize, fields: &[&str]) -> Result<[f64; NUMERIC_FIELDS]> {
    let mut values = [0.0; NUMERIC_FIELDS];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = field
            .parse::<f64>()
            .map_err(|_| Error::malformed(line, format!("'{field}' is not a number")))?;
        if !slot.is_finite() {
            return Err(Error::malformed(line, format!("'{field}' is not finite")));
        }
    }
    Ok(values)
}

fn shape_for(
    line: usize,
    token: &str,
    span1: Vector3<f64>,
    span2: Vector3<f64>,
    policy: ShapePolicy,
) -> Result<Shape> {
    match token {
        "ellipse" => {
            let (a, b) = (span1.norm(), span2.norm());
            if (a - b).abs() <= CIRCULAR_TOLERANCE * a.max(b) {
                Ok(Shape::disc(a))
            } else {
                Ok(Shape::Ellipse { span1, span2 })
            }
        }
        "rectangle" => Ok(Shape::Rectangle { span1, span2 }),
        other => match policy {
            ShapePolicy::Strict => Err(Error::UnknownShape {
                line,
                token: other.to_string(),
            }),
            ShapePolicy::Lenient => {
                warn!(line, token = other, "unknown shape, treating as rectangle");
                Ok(Shape::Rectangle { span1, span2 })
            }
        },
    }
}
