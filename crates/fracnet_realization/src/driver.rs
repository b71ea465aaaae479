//! Single-realization driver.
//!
//! A realization runs in five steps:
//!
//! 1. Seed a fresh [`VariateSampler`].
//! 2. Sample radii, then placement (poles and centers).
//! 3. Build the model, or take an ingested fracture list instead.
//! 4. Prune with the fracture box (if any) and classify the interior.
//! 5. Emit reports to the destination.

use fracnet_model::{
    filter, FractureSetModel, GenerationSettings, DEFAULT_GROUP, INTERIOR_SUFFIX,
};
use fracnet_sampling::{PlacementSampler, SizeSampler, VariateSampler};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::destination::OutputDestination;
use crate::error::Result;
use crate::render::{render_model, PolylineRenderer};
use crate::report::{
    center_report, radius_report, results_json, NetworkSummary, ReportSet, CENTERS_REPORT,
    INTERIOR_RADII_REPORT, PERIMETERS_REPORT, RADII_REPORT, RESULTS_REPORT,
};

/// Where a realization's fractures come from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FractureSource {
    /// Sample a new population from the settings.
    #[default]
    Sampled,
    /// Use a fixed, already-built model.
    Fixed(FractureSetModel),
}

/// Outcome of one realization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizationSummary {
    /// Seed the realization ran with.
    pub seed: u64,
    /// Destination label.
    pub destination: String,
    /// Fractures in the reported model.
    pub total: usize,
    /// Fractures inside the interior box.
    pub interior: usize,
    /// `interior / total`.
    pub interior_fraction: f64,
    /// Fractures per group.
    pub groups: BTreeMap<String, usize>,
    /// xxh64 over the emitted reports.
    pub fingerprint: u64,
}

/// Runs realizations for one set of settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RealizationDriver {
    settings: GenerationSettings,
    source: FractureSource,
}

impl RealizationDriver {
    /// Creates a driver that samples fractures.
    #[must_use]
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            source: FractureSource::Sampled,
        }
    }

    /// Replaces sampling with a fixed model, such as an ingested list.
    #[must_use]
    pub fn with_fracture_list(mut self, model: FractureSetModel) -> Self {
        self.source = FractureSource::Fixed(model);
        self
    }

    /// Settings in use.
    pub const fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Builds the full (unfiltered) model for `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling fails, including exhausted rejection
    /// placement.
    pub fn build_model(&self, seed: u64) -> Result<FractureSetModel> {
        match &self.source {
            FractureSource::Fixed(model) => Ok(model.clone()),
            FractureSource::Sampled => {
                let settings = &self.settings;
                let mut variates = VariateSampler::new(seed);
                let radii = SizeSampler::new(settings.size)?
                    .sample(&mut variates, settings.fracture_count);
                let fractures =
                    PlacementSampler::from_settings(settings).place(&mut variates, &radii)?;

                let mut model = FractureSetModel::new();
                model.get_or_create(DEFAULT_GROUP);
                for fracture in fractures {
                    model.insert(fracture);
                }
                Ok(model)
            }
        }
    }

    /// Builds the reports for `seed` without writing them.
    ///
    /// `existing_results` is the prior `results.json`, whose unrelated keys
    /// are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be built or a report cannot be
    /// rendered.
    pub fn reports(
        &self,
        seed: u64,
        existing_results: Option<&str>,
    ) -> Result<(ReportSet, NetworkSummary)> {
        let settings = &self.settings;
        let model = self.build_model(seed)?;

        let model = match (&settings.pruning_box(), &settings.fracture_box) {
            (Some(pruning), Some(fracture_box)) => {
                let pruned = filter(&model, pruning, &fracture_box.exempt_groups);
                debug!(
                    before = model.len(),
                    after = pruned.len(),
                    "pruned with fracture box"
                );
                pruned
            }
            _ => model,
        };
        let interior = filter(&model, &settings.interior_box(), &[] as &[&str]);
        let summary = NetworkSummary::new(&model, &interior, seed);

        let mut reports = ReportSet::new();
        reports.push(RADII_REPORT, radius_report(model.fractures())?);
        reports.push(CENTERS_REPORT, center_report(model.fractures())?);
        reports.push(INTERIOR_RADII_REPORT, radius_report(interior.fractures())?);
        reports.push(
            RESULTS_REPORT,
            results_json(existing_results, &model, &summary)?,
        );

        if settings.export_perimeters {
            let domain = &settings.domain;
            let mut faces = domain.faces(domain.hl1(), "");
            if settings.render_inner_box {
                faces.extend(domain.faces(domain.hl3(), INTERIOR_SUFFIX));
            }
            let mut renderer = PolylineRenderer::new();
            render_model(
                &mut renderer,
                &model,
                &faces,
                settings.effective_perimeter_points(),
            )?;
            reports.push(PERIMETERS_REPORT, renderer.into_report()?);
        }

        Ok((reports, summary))
    }

    /// Runs one realization and writes its reports to `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling fails or a report cannot be written.
    pub fn run(
        &self,
        seed: u64,
        destination: &mut dyn OutputDestination,
    ) -> Result<RealizationSummary> {
        let existing = destination.read_text(RESULTS_REPORT)?;
        let (reports, network) = self.reports(seed, existing.as_deref())?;
        reports.emit(destination)?;

        let summary = RealizationSummary {
            seed,
            destination: destination.label(),
            total: network.total_count,
            interior: network.interior_count,
            interior_fraction: network.interior_fraction,
            groups: network.groups,
            fingerprint: reports.fingerprint(),
        };
        info!(
            seed,
            total = summary.total,
            interior = summary.interior,
            fingerprint = %format!("{:016x}", summary.fingerprint),
            destination = %summary.destination,
            "realization complete"
        );
        Ok(summary)
    }
}
