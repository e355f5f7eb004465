//! Channel smoothing and orientation math.
//!
//! The smoother averages each vector channel over fixed-size contiguous
//! windows; the orientation helpers derive quaternions from the per-frame
//! basis samples. All functions are pure; degenerate geometry degrades to
//! the identity rotation instead of erroring.

use log::warn;
use nalgebra::{Unit, UnitQuaternion, Vector3};

use super::loaders::TrackChannels;

/// Squared length below which a direction counts as degenerate.
const DEGENERATE_EPS_SQ: f64 = 1e-18;

/// Cosine threshold above which the tracked direction counts as parallel
/// to the default up hint.
const NEAR_VERTICAL: f64 = 0.999_999;

/// Immutable smoothing parameters, computed once before the pipeline runs.
///
/// A requested batch size <= 1 disables smoothing and fixes the effective
/// batch size at 0; that 0 still feeds the keyframe frame-number offset,
/// so the two concerns stay consistent without any mid-pipeline mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingPlan {
    batch_size: usize,
}

impl SmoothingPlan {
    /// Build a plan from the raw (float) batch size, truncated to an integer.
    pub fn from_batch_size(raw: f64) -> Self {
        let truncated = raw.trunc();
        let batch_size = if truncated > 1.0 { truncated as usize } else { 0 };
        Self { batch_size }
    }

    /// Whether smoothing is applied at all.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.batch_size > 1
    }

    /// Effective batch size: 0 when disabled.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Constant offset added to keyframe indices before time scaling.
    #[inline]
    pub fn frame_offset(&self) -> usize {
        self.batch_size
    }
}

/// Average one vector channel over contiguous windows of the plan's batch
/// size.
///
/// With smoothing disabled the input is returned unchanged. Otherwise the
/// output has `floor(n / b)` vectors and `output[i]` is the mean of
/// `input[i*b .. i*b + b]`; a trailing partial window is dropped.
pub fn smooth_channel(points: &[Vector3<f64>], plan: &SmoothingPlan) -> Vec<Vector3<f64>> {
    if !plan.enabled() {
        return points.to_vec();
    }

    let batch = plan.batch_size();
    let output_len = points.len() / batch;

    (0..output_len)
        .map(|i| {
            let window = &points[i * batch..i * batch + batch];
            let sum = window
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p);
            sum / batch as f64
        })
        .collect()
}

/// Smooth all three channels with the same plan, preserving alignment.
pub fn smooth_channels(channels: &TrackChannels, plan: &SmoothingPlan) -> TrackChannels {
    let smoothed = TrackChannels {
        origin: smooth_channel(&channels.origin, plan),
        x_samples: smooth_channel(&channels.x_samples, plan),
        y_samples: smooth_channel(&channels.y_samples, plan),
    };
    debug_assert!(smoothed.is_aligned());
    smoothed
}

/// Derive the quaternion tracking `direction`.
///
/// The resulting rotation maps the local +Z axis onto `direction`, with the
/// +Y column constrained by a world +Z up hint (+X when the direction is
/// nearly vertical). A zero or near-zero direction yields the identity
/// rotation and logs a warning; it never raises a numerical-domain error.
pub fn track_quaternion(direction: &Vector3<f64>) -> UnitQuaternion<f64> {
    if direction.norm_squared() < DEGENERATE_EPS_SQ {
        warn!("degenerate track direction, falling back to identity rotation");
        return UnitQuaternion::identity();
    }

    let forward = direction.normalize();
    let up = if forward.z.abs() > NEAR_VERTICAL {
        Vector3::x()
    } else {
        Vector3::z()
    };

    UnitQuaternion::face_towards(&forward, &up)
}

/// Rotation taking the `from` sample onto the `to` sample.
///
/// Mirrors a "rotation difference" between two orientation vectors. For
/// antiparallel samples the rotation is a half turn about a deterministic
/// axis orthogonal to `from`; degenerate (zero-length) samples yield the
/// identity.
pub fn rotation_between_samples(
    from: &Vector3<f64>,
    to: &Vector3<f64>,
) -> UnitQuaternion<f64> {
    if from.norm_squared() < DEGENERATE_EPS_SQ || to.norm_squared() < DEGENERATE_EPS_SQ {
        warn!("degenerate basis sample, falling back to identity rotation");
        return UnitQuaternion::identity();
    }

    match UnitQuaternion::rotation_between(from, to) {
        Some(rotation) => rotation,
        None => {
            // Antiparallel samples: any orthogonal axis works, pick one
            // deterministically.
            let axis = Unit::new_normalize(orthogonal_to(from));
            UnitQuaternion::from_axis_angle(&axis, std::f64::consts::PI)
        }
    }
}

/// Euler angles of a rotation, in degrees (roll, pitch, yaw).
pub fn euler_degrees(rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
    let (roll, pitch, yaw) = rotation.euler_angles();
    Vector3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

/// A vector orthogonal to `v`, chosen deterministically.
fn orthogonal_to(v: &Vector3<f64>) -> Vector3<f64> {
    let candidate = if v.x.abs() < 0.9 * v.norm() {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&candidate)
}
