//! Attributed point cloud construction for the point-cloud import variant.

use nalgebra::Vector3;

use crate::core::loaders::TrackChannels;

use super::orientation::OrientationSample;

/// A static point cloud with one vertex per frame and four parallel
/// per-vertex attribute arrays.
///
/// Invariant: all five arrays have identical length. The cloud has no
/// edges or faces.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedCloud {
    pub name: String,
    /// Vertex positions (the origin channel).
    pub positions: Vec<Vector3<f64>>,
    /// X-axis basis sample per vertex (`vx`).
    pub vx: Vec<Vector3<f64>>,
    /// Y-axis basis sample per vertex (`vy`).
    pub vy: Vec<Vector3<f64>>,
    /// Relative-rotation Euler angles in degrees per vertex (`rot`).
    pub rot_euler_deg: Vec<Vector3<f64>>,
    /// Track quaternion per vertex as wxyz (`rot4`).
    pub rot_quat: Vec<[f64; 4]>,
}

impl AttributedCloud {
    /// Number of vertices in the cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the cloud has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Checks the equal-length invariant across all attribute arrays.
    pub fn is_aligned(&self) -> bool {
        let n = self.positions.len();
        self.vx.len() == n
            && self.vy.len() == n
            && self.rot_euler_deg.len() == n
            && self.rot_quat.len() == n
    }
}

/// Accumulate the channels and orientation samples into one cloud.
pub fn build_cloud(
    channels: &TrackChannels,
    samples: &[OrientationSample],
    name: &str,
) -> AttributedCloud {
    debug_assert_eq!(channels.len(), samples.len());

    let n = channels.len();
    let mut cloud = AttributedCloud {
        name: name.to_string(),
        positions: Vec::with_capacity(n),
        vx: Vec::with_capacity(n),
        vy: Vec::with_capacity(n),
        rot_euler_deg: Vec::with_capacity(n),
        rot_quat: Vec::with_capacity(n),
    };

    for (i, sample) in samples.iter().enumerate() {
        cloud.positions.push(channels.origin[i]);
        cloud.vx.push(channels.x_samples[i]);
        cloud.vy.push(channels.y_samples[i]);
        cloud.rot_euler_deg.push(sample.euler_deg);

        let quat = sample.track.quaternion();
        cloud.rot_quat.push([quat.w, quat.i, quat.j, quat.k]);
    }

    debug_assert!(cloud.is_aligned());
    cloud
}
