//! Grasshopper point-track CSV import pipeline.
//!
//! This crate provides tools for:
//! - Loading per-frame tracked positions and basis vectors from CSV recordings
//! - Optional windowed smoothing / downsampling of the vector channels
//! - Deriving per-frame orientation quaternions from the basis samples
//! - Emitting either a keyframed proxy animation or an attributed point cloud
//!
//! # Example
//!
//! ```no_run
//! use ghtrack_pipeline::{run_import, ImportConfig, ImportVariant, MemorySink};
//! use std::path::Path;
//!
//! let config = ImportConfig::default();
//! let mut sink = MemorySink::new();
//! let summary = run_import(
//!     Path::new("recording.csv"),
//!     ImportVariant::PointCloud,
//!     &config,
//!     &mut sink,
//! )
//! .unwrap();
//! println!("{} vertices emitted", summary.samples_emitted);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;
pub mod visualization;

pub use config::{Axis, ImportConfig, PostRotateConfig, SmoothingConfig};
pub use core::loaders::{TrackChannels, LoaderError};
pub use core::transforms::SmoothingPlan;
pub use processors::importer::{
    run_import, FileSink, ImportSummary, ImportVariant, MemorySink, SceneSink,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
