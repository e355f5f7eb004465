//! Per-frame orientation derivation.
//!
//! For every index of the (possibly smoothed) channels this stage derives a
//! track quaternion from the direction `y_sample - origin` and an Euler
//! triple from the relative rotation between the two basis samples. Both
//! outputs are raw: the post-rotation offset belongs to the keyed Euler
//! channel of the animation variant only and is applied there.

use nalgebra::{UnitQuaternion, Vector3};
use rayon::prelude::*;

use crate::config::Axis;
use crate::core::loaders::TrackChannels;
use crate::core::transforms::{euler_degrees, rotation_between_samples, track_quaternion};

/// Fixed-angle, fixed-axis rotation added to a keyed Euler rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostRotation {
    pub axis: Axis,
    pub angle_deg: f64,
}

impl PostRotation {
    /// Add this offset to the selected component of an Euler triple.
    #[inline]
    pub fn apply(&self, euler_deg: &mut Vector3<f64>) {
        euler_deg[self.axis.index()] += self.angle_deg;
    }
}

/// Orientation derived for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationSample {
    /// Quaternion tracking `y_sample - origin`.
    pub track: UnitQuaternion<f64>,
    /// Euler angles (degrees) of the x-sample to y-sample rotation.
    pub euler_deg: Vector3<f64>,
}

/// Derive one [`OrientationSample`] per frame of the channels.
///
/// Frames are independent and processed in parallel. Degenerate directions
/// or basis samples degrade to the identity rotation (see
/// [`crate::core::transforms`]); this function never fails.
pub fn derive_orientations(channels: &TrackChannels) -> Vec<OrientationSample> {
    debug_assert!(channels.is_aligned());

    (0..channels.len())
        .into_par_iter()
        .map(|i| {
            let origin = &channels.origin[i];
            let x_sample = &channels.x_samples[i];
            let y_sample = &channels.y_samples[i];

            let direction = y_sample - origin;
            let track = track_quaternion(&direction);

            let relative = rotation_between_samples(x_sample, y_sample);
            let euler_deg = euler_degrees(&relative);

            OrientationSample { track, euler_deg }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_basis_channels(origins: Vec<Vector3<f64>>) -> TrackChannels {
        let n = origins.len();
        TrackChannels {
            origin: origins,
            x_samples: vec![Vector3::x(); n],
            y_samples: vec![Vector3::y(); n],
        }
    }

    #[test]
    fn test_one_sample_per_frame() {
        let channels = unit_basis_channels(vec![Vector3::zeros(); 4]);
        let samples = derive_orientations(&channels);
        assert_eq!(samples.len(), 4);
    }

    #[test]
    fn test_track_follows_direction() {
        // origin at the y-sample makes the direction degenerate; offset
        // origins give a well-defined direction.
        let channels = unit_basis_channels(vec![Vector3::new(0.0, -1.0, 0.0)]);
        let samples = derive_orientations(&channels);

        // direction = (0,1,0) - (0,-1,0) = (0,2,0)
        let tracked = samples[0].track * Vector3::z();
        assert!((tracked - Vector3::y()).norm() < 1e-9);
    }

    #[test]
    fn test_degenerate_direction_yields_identity() {
        // origin == y_sample: zero-length direction must not panic.
        let channels = TrackChannels {
            origin: vec![Vector3::y()],
            x_samples: vec![Vector3::x()],
            y_samples: vec![Vector3::y()],
        };
        let samples = derive_orientations(&channels);
        assert_eq!(samples[0].track, UnitQuaternion::identity());
    }

    #[test]
    fn test_euler_from_basis_rotation() {
        // x -> y is a 90 degree yaw.
        let channels = unit_basis_channels(vec![Vector3::new(0.0, -1.0, 0.0)]);
        let samples = derive_orientations(&channels);
        assert!((samples[0].euler_deg.z - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_post_rotation_offsets_single_component() {
        let post = PostRotation {
            axis: Axis::X,
            angle_deg: 45.0,
        };

        let mut euler = Vector3::new(10.0, 20.0, 30.0);
        post.apply(&mut euler);

        assert_eq!(euler, Vector3::new(55.0, 20.0, 30.0));
    }

    #[test]
    fn test_unit_norm_for_all_samples() {
        let origins = (0..8)
            .map(|i| Vector3::new(i as f64 * 0.1, -1.0, (i % 3) as f64))
            .collect();
        let channels = unit_basis_channels(origins);

        let samples = derive_orientations(&channels);
        for sample in &samples {
            assert!((sample.track.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic() {
        let channels = unit_basis_channels(vec![
            Vector3::new(0.4, -0.3, 0.1),
            Vector3::new(0.5, -0.2, 0.2),
        ]);
        let a = derive_orientations(&channels);
        let b = derive_orientations(&channels);
        assert_eq!(a, b);
    }
}
