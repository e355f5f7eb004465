//! Configuration types for the track import pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Axis selector for the post-rotation offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in an Euler triple.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Configuration for track smoothing / downsampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Number of consecutive samples averaged into one output sample.
    /// Supplied as a float and truncated to integer use; values <= 1
    /// disable smoothing.
    #[serde(default = "default_batch_size")]
    pub batch_size: f64,
}

fn default_batch_size() -> f64 {
    1.0
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

/// Configuration for the fixed post-rotation applied to the Euler channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRotateConfig {
    /// Whether the post-rotation is applied at all.
    #[serde(default = "default_post_rotate_enabled")]
    pub enabled: bool,

    /// Axis the offset is added on.
    #[serde(default = "default_post_rotate_axis")]
    pub axis: Axis,

    /// Offset angle in degrees.
    #[serde(default = "default_post_rotate_angle")]
    pub angle_deg: f64,
}

fn default_post_rotate_enabled() -> bool {
    true
}

fn default_post_rotate_axis() -> Axis {
    Axis::Y
}

fn default_post_rotate_angle() -> f64 {
    45.0
}

impl Default for PostRotateConfig {
    fn default() -> Self {
        Self {
            enabled: default_post_rotate_enabled(),
            axis: default_post_rotate_axis(),
            angle_deg: default_post_rotate_angle(),
        }
    }
}

/// Configuration for keyframe emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Time/speed scale applied to frame numbers.
    #[serde(default = "default_time_rate")]
    pub time_rate: f64,
}

fn default_time_rate() -> f64 {
    1.0
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_rate: default_time_rate(),
        }
    }
}

/// Main import configuration combining all sub-configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Scale factor applied to every extracted coordinate.
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Name of the emitted object (proxy or point cloud).
    #[serde(default = "default_output_name")]
    pub output_name: String,

    #[serde(default)]
    pub smoothing: SmoothingConfig,

    #[serde(default)]
    pub post_rotate: PostRotateConfig,

    #[serde(default)]
    pub animation: AnimationConfig,
}

fn default_scale() -> f64 {
    0.01
}

fn default_output_name() -> String {
    "gh_import".to_string()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            output_name: default_output_name(),
            smoothing: SmoothingConfig::default(),
            post_rotate: PostRotateConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl ImportConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: ImportConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_import_config() {
        let config = ImportConfig::default();
        assert_eq!(config.scale, 0.01);
        assert_eq!(config.output_name, "gh_import");
        assert_eq!(config.smoothing.batch_size, 1.0);
        assert_eq!(config.animation.time_rate, 1.0);
    }

    #[test]
    fn test_default_post_rotate() {
        let config = PostRotateConfig::default();
        assert!(config.enabled);
        assert_eq!(config.axis, Axis::Y);
        assert_eq!(config.angle_deg, 45.0);
    }

    #[test]
    fn test_axis_index() {
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Y.index(), 1);
        assert_eq!(Axis::Z.index(), 2);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ImportConfig = serde_yaml::from_str("scale: 1.0\n").unwrap();
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.output_name, "gh_import");
        assert!(config.post_rotate.enabled);
    }
}
