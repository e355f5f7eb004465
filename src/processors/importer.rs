//! Import orchestration and the scene-sink boundary.
//!
//! The pipeline stages (load, extract, smooth, orient) are pure; everything
//! that touches the outside world goes through [`SceneSink`], so the
//! transform-derivation core has no dependency on any host object model.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::ImportConfig;
use crate::core::loaders::{extract_channels, load_track_rows};
use crate::core::transforms::{smooth_channels, SmoothingPlan};
use crate::core::writers::{write_attributed_ply, write_keyframes_csv, write_proxy_cube_ply};

use super::animation::{build_keyframes, AnimatedTransform};
use super::cloud::{build_cloud, AttributedCloud};
use super::orientation::{derive_orientations, PostRotation};

/// The two import output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportVariant {
    /// Keyframed transform on a single proxy object.
    Animation,
    /// Static attributed point cloud.
    PointCloud,
}

impl std::fmt::Display for ImportVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportVariant::Animation => write!(f, "animation"),
            ImportVariant::PointCloud => write!(f, "point cloud"),
        }
    }
}

/// Receiver of import outputs.
///
/// Two operations, one per variant. Implementations own whatever they
/// create; the pipeline hands outputs over by reference and keeps nothing.
pub trait SceneSink {
    /// Create or update the animated proxy with a full keyframe set.
    fn upsert_animated_transform(&mut self, transform: &AnimatedTransform) -> Result<()>;

    /// Emit a finished point cloud.
    fn emit_point_cloud(&mut self, cloud: &AttributedCloud) -> Result<()>;
}

/// File-backed sink: keyframe CSV plus a proxy cube PLY for the animation
/// variant, an attributed PLY for the point-cloud variant.
#[derive(Debug)]
pub struct FileSink {
    out_dir: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the keyframe CSV for a given object name.
    pub fn keyframes_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{}_keyframes.csv", name))
    }

    /// Path of the proxy cube PLY for a given object name.
    pub fn proxy_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{}_proxy.ply", name))
    }

    /// Path of the point-cloud PLY for a given object name.
    pub fn cloud_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{}.ply", name))
    }
}

impl SceneSink for FileSink {
    fn upsert_animated_transform(&mut self, transform: &AnimatedTransform) -> Result<()> {
        // Counterpart of the host creating a default cube on first use:
        // the proxy is only written when no target exists yet.
        let proxy = self.proxy_path(&transform.name);
        if !proxy.exists() {
            write_proxy_cube_ply(&proxy, &transform.name)
                .with_context(|| format!("writing proxy object '{}'", transform.name))?;
            info!("created proxy object: {}", proxy.display());
        }

        let keyframes = self.keyframes_path(&transform.name);
        write_keyframes_csv(&keyframes, transform)
            .with_context(|| format!("writing keyframes for '{}'", transform.name))?;
        info!(
            "wrote {} keyframes to {}",
            transform.len(),
            keyframes.display()
        );
        Ok(())
    }

    fn emit_point_cloud(&mut self, cloud: &AttributedCloud) -> Result<()> {
        let path = self.cloud_path(&cloud.name);
        write_attributed_ply(&path, cloud)
            .with_context(|| format!("writing point cloud '{}'", cloud.name))?;
        info!("wrote {} vertices to {}", cloud.len(), path.display());
        Ok(())
    }
}

/// In-memory sink storing emitted outputs, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub transforms: Vec<AnimatedTransform>,
    pub clouds: Vec<AttributedCloud>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneSink for MemorySink {
    fn upsert_animated_transform(&mut self, transform: &AnimatedTransform) -> Result<()> {
        self.transforms.push(transform.clone());
        Ok(())
    }

    fn emit_point_cloud(&mut self, cloud: &AttributedCloud) -> Result<()> {
        self.clouds.push(cloud.clone());
        Ok(())
    }
}

/// Summary of one import invocation.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub variant: ImportVariant,
    pub name: String,
    /// Data rows read from the file (header excluded).
    pub rows_read: usize,
    /// Keyframes or vertices emitted after smoothing.
    pub samples_emitted: usize,
    /// Effective smoothing batch size (0 = smoothing disabled).
    pub smoothing_batch: usize,
}

/// Run the whole import pipeline against a sink.
///
/// Stages: row loading, channel extraction with the configured scale,
/// optional windowed smoothing, orientation derivation, and emission of the
/// requested variant. One-shot and synchronous; no retries.
pub fn run_import<S: SceneSink>(
    path: &Path,
    variant: ImportVariant,
    config: &ImportConfig,
    sink: &mut S,
) -> Result<ImportSummary> {
    let rows = load_track_rows(path)
        .with_context(|| format!("loading track recording {}", path.display()))?;
    info!("loaded {} data rows from {}", rows.len(), path.display());

    let channels = extract_channels(&rows, config.scale)
        .with_context(|| format!("extracting channels from {}", path.display()))?;

    let plan = SmoothingPlan::from_batch_size(config.smoothing.batch_size);
    let channels = smooth_channels(&channels, &plan);
    if plan.enabled() {
        info!(
            "smoothed to {} samples (batch size {})",
            channels.len(),
            plan.batch_size()
        );
    }
    if channels.is_empty() {
        warn!("no samples left after smoothing; output will be empty");
    }

    let samples = derive_orientations(&channels);

    // The post-rotation offset only affects the keyed Euler channel of the
    // animation variant; point-cloud attributes stay raw.
    let post_rotation = if config.post_rotate.enabled {
        Some(PostRotation {
            axis: config.post_rotate.axis,
            angle_deg: config.post_rotate.angle_deg,
        })
    } else {
        None
    };

    match variant {
        ImportVariant::Animation => {
            let transform = build_keyframes(
                &channels,
                &samples,
                &plan,
                config.animation.time_rate,
                post_rotation.as_ref(),
                &config.output_name,
            );
            sink.upsert_animated_transform(&transform)?;
        }
        ImportVariant::PointCloud => {
            let cloud = build_cloud(&channels, &samples, &config.output_name);
            sink.emit_point_cloud(&cloud)?;
        }
    }

    Ok(ImportSummary {
        variant,
        name: config.output_name.clone(),
        rows_read: rows.len(),
        samples_emitted: channels.len(),
        smoothing_batch: plan.batch_size(),
    })
}
