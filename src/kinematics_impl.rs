//! Closed-form kinematics of the two-link planar chain and of the 3R arm built on it.
//!
//! The 3R arm is a base yaw joint carrying a two link chain that moves in a vertical
//! (sagittal) plane. Inverse kinematics therefore reduces to the yaw angle plus the planar
//! two link problem in that plane, solved for both elbow signs.

use std::f64::consts::FRAC_PI_2;

use tracing::{debug, trace};

use crate::kinematic_traits::{
    Elbow, IkFailure, Joints3R, Kinematics, PlanarChain, Position, Position2, Solution3R,
};
use crate::parameters::arm_kinematics::LinkLengths;

/// Extra cost of the elbow configuration that was not asked for. Only decides between
/// candidates with nearly the same elbow height.
pub const ELBOW_PREFERENCE_PENALTY: f64 = 0.1;

/// Heights closer to the floor than this are taken as exactly on the floor. A target on the
/// floor would otherwise land a few ulps below it about half of the time.
pub const FLOOR_EPSILON: f64 = 1e-12;

pub(crate) fn snap_to_floor(height: f64) -> f64 {
    if height.abs() < FLOOR_EPSILON { 0.0 } else { height }
}

/// Raw output of the planar two link solver. Angles are defined even if `ok` is false,
/// but must not be used then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoLinkIk {
    pub q1: f64,
    pub q2: f64,
    pub ok: bool,
}

/// Forward kinematics of the planar two link chain.
pub fn fk_2link(l1: f64, l2: f64, q1: f64, q2: f64) -> PlanarChain {
    let joint = Position2::new(l1 * q1.cos(), l1 * q1.sin());
    let tip = joint + Position2::new(l2 * (q1 + q2).cos(), l2 * (q1 + q2).sin());
    PlanarChain { joint, tip }
}

/// Planar two link inverse kinematics for the given elbow sign (law of cosines).
///
/// The cosine of the elbow angle is clamped to [-1, 1], so angles are always finite.
/// `ok` tells if the target is actually inside the reach annulus
/// `[|l1 - l2|, l1 + l2]`, boundaries included.
pub fn ik_2link(l1: f64, l2: f64, x: f64, y: f64, elbow: Elbow) -> TwoLinkIk {
    let rr = x * x + y * y;
    let c2 = ((rr - l1 * l1 - l2 * l2) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
    let s2 = elbow.sign() * (1.0 - c2 * c2).max(0.0).sqrt();
    let q2 = s2.atan2(c2);
    let k1 = l1 + l2 * c2;
    let k2 = l2 * s2;
    let q1 = y.atan2(x) - k2.atan2(k1);
    TwoLinkIk { q1, q2, ok: reach_failure(l1, l2, rr).is_none() }
}

/// Classifies squared distance `rr` against the reach annulus of a two link chain.
pub fn reach_failure(l1: f64, l2: f64, rr: f64) -> Option<IkFailure> {
    if rr > (l1 + l2).powi(2) {
        Some(IkFailure::BeyondReach)
    } else if rr < (l1 - l2).powi(2) {
        Some(IkFailure::InsideDeadZone)
    } else {
        None
    }
}

/// Forward kinematics of the 3R arm. Yaw 0 points toward +z.
pub fn fk_3r(l1: f64, l2: f64, q1: f64, q2: f64, q3: f64) -> Position {
    let planar = fk_2link(l1, l2, q2, q3).tip;
    let r = planar.x;
    Position::new(q1.sin() * r, planar.y, q1.cos() * r)
}

/// Inverse kinematics of the 3R arm.
///
/// Negative `y` is treated as lying on the floor. Both elbow signs are tried; candidates
/// where the elbow or the tip would be below the floor are dropped. Among the rest, the
/// one with the highest elbow wins, with a small penalty for the elbow sign that was not
/// preferred.
pub fn ik_3r(
    l1: f64, l2: f64, x: f64, y: f64, z: f64, preferred: Elbow,
) -> Result<Solution3R, IkFailure> {
    let y_clamped = y.max(0.0);
    let r = x.hypot(z);
    let q1 = x.atan2(z); // same convention as forward: x = sin(q1) * r

    let mut best: Option<Solution3R> = None;
    for elbow in Elbow::BOTH {
        let planar = ik_2link(l1, l2, r, y_clamped, elbow);
        if !planar.ok {
            trace!("3R elbow {}: out of reach", elbow);
            continue;
        }
        let y_elbow = snap_to_floor(l1 * planar.q1.sin());
        let y_tip = snap_to_floor(y_elbow + l2 * (planar.q1 + planar.q2).sin());
        if y_elbow < 0.0 || y_tip < 0.0 {
            debug!("3R elbow {} rejected, elbow at {:.4}, tip at {:.4}", elbow, y_elbow, y_tip);
            continue;
        }
        // Folded flat on the floor the shoulder comes as ±π, with the same snapped height.
        // Only +π lies in the shoulder range [0, π].
        if planar.q1 < -FRAC_PI_2 {
            debug!("3R elbow {} rejected, shoulder at {:.4} rad", elbow, planar.q1);
            continue;
        }
        let cost = -y_elbow + if elbow == preferred { 0.0 } else { ELBOW_PREFERENCE_PENALTY };
        let candidate = Solution3R {
            joints: Joints3R::new(q1, planar.q1, planar.q2),
            elbow,
            y_elbow,
            y_tip,
            cost,
        };
        if best.is_none_or(|b| candidate.cost < b.cost) {
            best = Some(candidate);
        }
    }

    match best {
        Some(solution) => Ok(solution),
        None => Err(reach_failure(l1, l2, r * r + y_clamped * y_clamped)
            .unwrap_or(IkFailure::BelowFloor)),
    }
}

/// The 3R arm as a [`Kinematics`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct ThreeRKinematics {
    pub lengths: LinkLengths,
    pub preferred_elbow: Elbow,
}

impl ThreeRKinematics {
    /// Creates a new `ThreeRKinematics` instance, preferring the positive elbow.
    pub fn new(lengths: LinkLengths) -> Self {
        ThreeRKinematics { lengths, preferred_elbow: Elbow::Positive }
    }

    pub fn with_preferred_elbow(lengths: LinkLengths, preferred_elbow: Elbow) -> Self {
        ThreeRKinematics { lengths, preferred_elbow }
    }

    /// Height of the elbow joint above the floor.
    pub fn elbow_height(&self, joints: &Joints3R) -> f64 {
        snap_to_floor(self.lengths.l1 * joints.q2.sin())
    }

    /// Position of the elbow joint in space.
    pub fn elbow_position(&self, joints: &Joints3R) -> Position {
        let elbow = fk_2link(self.lengths.l1, self.lengths.l2, joints.q2, joints.q3).joint;
        Position::new(joints.q1.sin() * elbow.x, elbow.y, joints.q1.cos() * elbow.x)
    }

    /// True if the tip would be below the floor with these joint values.
    pub fn tip_below_floor(&self, joints: &Joints3R) -> bool {
        snap_to_floor(self.forward(joints).y) < 0.0
    }
}

impl Kinematics for ThreeRKinematics {
    type Joints = Joints3R;
    type Position = Position;
    type Solution = Solution3R;

    fn forward(&self, joints: &Joints3R) -> Position {
        let LinkLengths { l1, l2 } = self.lengths;
        fk_3r(l1, l2, joints.q1, joints.q2, joints.q3)
    }

    fn inverse(&self, target: &Position) -> Result<Solution3R, IkFailure> {
        let LinkLengths { l1, l2 } = self.lengths;
        ik_3r(l1, l2, target.x, target.y, target.z, self.preferred_elbow)
    }
}
