//! Fracture network model for fracnet.
//!
//! This crate provides:
//! - Planar fracture shapes with perimeter sampling and separation distance
//! - Named fracture groups collected into a [`FractureSetModel`]
//! - Nested domain boxes and center-based domain filtering
//! - The settings record and its validation into [`GenerationSettings`]
//! - A parser for tab-separated fracture lists
//!
//! # Example
//!
//! ```rust,ignore
//! use fracnet_model::{filter, GenerationSettings};
//!
//! let settings = GenerationSettings::load("settings.json")?;
//! let interior = filter(&model, &settings.interior_box(), &[] as &[&str]);
//! println!("{} of {} fractures inside", interior.len(), model.len());
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod domain;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod settings;

pub use domain::{BoxFace, DomainBox, DomainSpec, FACE_LAYERS, INTERIOR_SUFFIX};
pub use error::{Error, Result};
pub use filter::{classify, filter};
pub use geometry::{
    perimeter_distance, segment_distance, Shape, ShapeKind, DEFAULT_PERIMETER_POINTS,
};
pub use model::{fracture_name, Fracture, FractureSet, FractureSetModel, DEFAULT_GROUP};
pub use parser::{parse_fracture_list, read_fracture_list, ShapePolicy};
pub use settings::{
    FractureBox, GenerationSettings, Hemisphere, RawFractureBox, RawSettings, SizeDistribution,
};
