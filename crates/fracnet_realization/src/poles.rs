//! Pole aggregation across realizations.

use nalgebra::Vector3;
use tracing::debug;

use crate::destination::OutputDestination;
use crate::error::{Error, Result};
use crate::report::{finish_tsv, parse_fracture_entries, tsv_writer, RESULTS_REPORT};

/// Report written by pole aggregation.
pub const POLES_REPORT: &str = "poles.tsv";

/// Collects the unit normal of every fracture reported by `destinations`.
///
/// Poles are returned destination by destination, fractures in name order.
///
/// # Errors
///
/// Returns [`Error::MissingReport`] if a destination has no `results.json`,
/// or an error if a report cannot be parsed.
pub fn collect_poles<'a, D, I>(destinations: I) -> Result<Vec<Vector3<f64>>>
where
    D: OutputDestination + ?Sized + 'a,
    I: IntoIterator<Item = &'a D>,
{
    let mut poles = Vec::new();
    for destination in destinations {
        let results = destination
            .read_text(RESULTS_REPORT)?
            .ok_or_else(|| Error::MissingReport {
                report: RESULTS_REPORT.to_string(),
                destination: destination.label(),
            })?;
        let entries = parse_fracture_entries(&results)?;
        debug!(
            destination = %destination.label(),
            poles = entries.len(),
            "collected poles"
        );
        poles.extend(entries.values().map(|e| Vector3::from(e.unit_normal)));
    }
    Ok(poles)
}

/// Renders poles as `x<TAB>y<TAB>z` lines.
///
/// # Errors
///
/// Returns an error if the TSV writer fails.
pub fn poles_report(poles: &[Vector3<f64>]) -> Result<String> {
    let mut writer = tsv_writer();
    for pole in poles {
        writer.write_record([pole.x.to_string(), pole.y.to_string(), pole.z.to_string()])?;
    }
    finish_tsv(writer)
}
