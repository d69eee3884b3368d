//! Time based interpolation between two states of an arm.
//!
//! An [`AnimationState`] does not own a timer. The host calls [`AnimationState::advance`]
//! from its own frame callback with the current time and writes the returned value back into
//! its pose; once `done` is reported, the animation is over and can be dropped.
//! Timing follows [`ease_in_out_cubic`] over the normalized elapsed time.

use crate::kinematic_traits::{Joints2R, Joints3R, JointsPolar, Position};
use crate::utils::{angle_lerp, clamp, ease_in_out_cubic, lerp, wrap_deg};

/// What is being interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// The Cartesian target moves; joints are not driven.
    CartesianLerp,
    /// The joints move; the target follows through forward kinematics.
    JointLerp,
}

/// Values that can be blended between a start and an end state.
pub trait Interpolate: Copy {
    const KIND: AnimationKind;

    /// Value at eased fraction `e`, `0` being `self` and `1` being `end`.
    fn interpolate(&self, end: &Self, e: f64) -> Self;
}

impl Interpolate for Position {
    const KIND: AnimationKind = AnimationKind::CartesianLerp;

    fn interpolate(&self, end: &Self, e: f64) -> Self {
        Position::new(lerp(self.x, end.x, e), lerp(self.y, end.y, e), lerp(self.z, end.z, e))
    }
}

/// Yaw and elbow take the shorter way around, the shoulder (limited to [0°, 180°]) moves
/// linearly. Yaw and elbow come out in [0°, 360°).
impl Interpolate for Joints3R {
    const KIND: AnimationKind = AnimationKind::JointLerp;

    fn interpolate(&self, end: &Self, e: f64) -> Self {
        Joints3R::from_degrees(
            angle_lerp(self.q1.to_degrees(), end.q1.to_degrees(), e),
            lerp(self.q2.to_degrees(), end.q2.to_degrees(), e),
            angle_lerp(self.q3.to_degrees(), end.q3.to_degrees(), e),
        )
    }
}

/// Yaw takes the shorter way around and comes out in [-180°, 180°). Elevation and
/// extension move linearly.
impl Interpolate for JointsPolar {
    const KIND: AnimationKind = AnimationKind::JointLerp;

    fn interpolate(&self, end: &Self, e: f64) -> Self {
        let theta = angle_lerp(self.theta.to_degrees(), end.theta.to_degrees(), e);
        JointsPolar::from_degrees(
            wrap_deg(theta, -180.0),
            lerp(self.phi.to_degrees(), end.phi.to_degrees(), e),
            lerp(self.rho, end.rho, e),
        )
    }
}

/// Both joints of the planar arm are unlimited and take the shorter way, in [-180°, 180°).
impl Interpolate for Joints2R {
    const KIND: AnimationKind = AnimationKind::JointLerp;

    fn interpolate(&self, end: &Self, e: f64) -> Self {
        let q1 = angle_lerp(self.q1.to_degrees(), end.q1.to_degrees(), e);
        let q2 = angle_lerp(self.q2.to_degrees(), end.q2.to_degrees(), e);
        Joints2R::from_degrees(wrap_deg(q1, -180.0), wrap_deg(q2, -180.0))
    }
}

/// Normalized elapsed time, `min(1, elapsed / duration)`, never negative.
/// A non-positive duration is complete immediately.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if !(duration_ms > 0.0) {
        return 1.0;
    }
    clamp(elapsed_ms / duration_ms, 0.0, 1.0)
}

/// Value of an animation from `start` to `end` after `elapsed_ms` out of `duration_ms`.
/// The kind of interpolation is given by the type of the values.
pub fn interpolate_animation<T: Interpolate>(
    start: &T, end: &T, elapsed_ms: f64, duration_ms: f64,
) -> T {
    start.interpolate(end, ease_in_out_cubic(progress(elapsed_ms, duration_ms)))
}

/// One running animation: where it starts, where it ends and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState<T> {
    pub start: T,
    pub end: T,
    /// Time stamp of the first frame, milliseconds, on the clock of the host.
    pub start_time_ms: f64,
    pub duration_ms: f64,
}

impl<T: Interpolate> AnimationState<T> {
    pub fn new(start: T, end: T, start_time_ms: f64, duration_ms: f64) -> Self {
        AnimationState { start, end, start_time_ms, duration_ms }
    }

    pub fn kind(&self) -> AnimationKind {
        T::KIND
    }

    /// Normalized time at `now_ms`, in [0, 1].
    pub fn progress(&self, now_ms: f64) -> f64 {
        progress(now_ms - self.start_time_ms, self.duration_ms)
    }

    /// Interpolated value at `now_ms` and whether the animation has completed. Calling it
    /// again after completion keeps returning the end value.
    pub fn advance(&self, now_ms: f64) -> (T, bool) {
        let t = self.progress(now_ms);
        let value = interpolate_animation(
            &self.start, &self.end, now_ms - self.start_time_ms, self.duration_ms,
        );
        (value, t >= 1.0)
    }
}
