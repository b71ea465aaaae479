//! Seeded stochastic sampling of fracture populations.
//!
//! This crate provides:
//! - A ChaCha-backed variate source with optional grid snapping
//! - Bounded power-law radius sampling
//! - Uniform pole sampling on the sphere or a folded hemisphere
//! - Independent and minimum-separation (rejection) placement
//!
//! All draws of one realization come from a single [`VariateSampler`], so
//! the same seed always yields the same fractures.
//!
//! # Example
//!
//! ```rust,ignore
//! use fracnet_sampling::{PlacementSampler, SizeSampler, VariateSampler};
//!
//! let mut variates = VariateSampler::new(settings.seed);
//! let radii = SizeSampler::new(settings.size)?.sample(&mut variates, settings.fracture_count);
//! let fractures = PlacementSampler::from_settings(&settings).place(&mut variates, &radii)?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod orientation;
pub mod placement;
pub mod size;
pub mod variate;

pub use error::{Error, Result};
pub use orientation::OrientationSampler;
pub use placement::{PlacementMode, PlacementSampler, ATTEMPTS_PER_FRACTURE};
pub use size::SizeSampler;
pub use variate::VariateSampler;
