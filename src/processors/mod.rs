//! Pipeline processing stages.

pub mod animation;
pub mod cloud;
pub mod importer;
pub mod orientation;

// Re-export key types for convenience
pub use animation::{build_keyframes, AnimatedTransform, Keyframe};
pub use cloud::{build_cloud, AttributedCloud};
pub use importer::{
    run_import, FileSink, ImportSummary, ImportVariant, MemorySink, SceneSink,
};
pub use orientation::{derive_orientations, OrientationSample, PostRotation};
