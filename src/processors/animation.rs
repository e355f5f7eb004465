//! Keyframe construction for the animated-proxy import variant.

use nalgebra::{UnitQuaternion, Vector3};

use crate::core::loaders::TrackChannels;
use crate::core::transforms::{euler_degrees, SmoothingPlan};

use super::orientation::{OrientationSample, PostRotation};

/// One location/rotation keyframe pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Frame number: `round((index + batch_size) * time_rate)`.
    pub frame: i64,
    /// World-space location of the proxy.
    pub location: Vector3<f64>,
    /// Keyed Euler rotation in degrees (track rotation plus the
    /// post-rotation offset on the configured axis).
    pub rotation_euler_deg: Vector3<f64>,
    /// The underlying track quaternion, kept alongside the Euler triple.
    pub rotation: UnitQuaternion<f64>,
}

/// A named, time-ordered keyframe set for a single proxy object.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedTransform {
    pub name: String,
    pub keyframes: Vec<Keyframe>,
}

impl AnimatedTransform {
    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

/// Build the keyframe set for the animated-proxy variant.
///
/// The frame number of index `i` is `round((i + b) * time_rate)` where `b`
/// is the plan's effective batch size (0 when smoothing is disabled), so
/// frame numbers carry a constant offset equal to the batch size.
pub fn build_keyframes(
    channels: &TrackChannels,
    samples: &[OrientationSample],
    plan: &SmoothingPlan,
    time_rate: f64,
    post_rotation: Option<&PostRotation>,
    name: &str,
) -> AnimatedTransform {
    debug_assert_eq!(channels.len(), samples.len());

    let offset = plan.frame_offset();
    let keyframes = samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let frame = ((i + offset) as f64 * time_rate).round() as i64;

            let mut rotation_euler_deg = euler_degrees(&sample.track);
            if let Some(post) = post_rotation {
                post.apply(&mut rotation_euler_deg);
            }

            Keyframe {
                frame,
                location: channels.origin[i],
                rotation_euler_deg,
                rotation: sample.track,
            }
        })
        .collect();

    AnimatedTransform {
        name: name.to_string(),
        keyframes,
    }
}
