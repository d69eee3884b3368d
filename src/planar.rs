//! Planar two link arm standing on a floor (`y = 0`).

use tracing::debug;

use crate::kinematic_traits::{
    Elbow, IkFailure, Joints2R, Kinematics, PlanarChain, Position2, Solution2R,
};
use crate::kinematics_impl::{fk_2link, ik_2link, snap_to_floor};
use crate::parameters::arm_kinematics::LinkLengths;

/// Slack on the reach annulus of the planar arm, so that targets picked exactly on the
/// boundary (for instance by clicking) are not lost to rounding.
pub const REACH_TOLERANCE: f64 = 1e-6;

pub fn fk_2r(l1: f64, l2: f64, q1: f64, q2: f64) -> PlanarChain {
    fk_2link(l1, l2, q1, q2)
}

/// Inverse kinematics of the planar arm for the given elbow sign, with floor handling:
/// negative `y` is solved as `y = 0`, and a solution leaving the tip below the floor
/// is rejected.
pub fn ik_2r(l1: f64, l2: f64, x: f64, y: f64, elbow: Elbow) -> Result<Solution2R, IkFailure> {
    let y_clamped = y.max(0.0);
    let d = x.hypot(y_clamped);
    if d > l1 + l2 + REACH_TOLERANCE {
        return Err(IkFailure::BeyondReach);
    }
    if d < (l1 - l2).abs() - REACH_TOLERANCE {
        return Err(IkFailure::InsideDeadZone);
    }

    let ik = ik_2link(l1, l2, x, y_clamped, elbow);
    let y_tip = snap_to_floor(fk_2r(l1, l2, ik.q1, ik.q2).tip.y);
    if y_tip < 0.0 {
        debug!("2R elbow {} leaves the tip at {:.4}, below the floor", elbow, y_tip);
        return Err(IkFailure::BelowFloor);
    }
    Ok(Solution2R { joints: Joints2R::new(ik.q1, ik.q2), elbow, y_tip })
}

/// True if these joint values put the tip of the planar arm below the floor.
pub fn tip_below_floor(l1: f64, l2: f64, joints: &Joints2R) -> bool {
    snap_to_floor(fk_2r(l1, l2, joints.q1, joints.q2).tip.y) < 0.0
}

/// The planar arm as a [`Kinematics`] implementation. Unlike the 3R arm, only the
/// preferred elbow is tried.
#[derive(Debug, Clone, Copy)]
pub struct PlanarKinematics {
    pub lengths: LinkLengths,
    pub elbow: Elbow,
}

impl PlanarKinematics {
    pub fn new(lengths: LinkLengths, elbow: Elbow) -> Self {
        PlanarKinematics { lengths, elbow }
    }

    /// Both the intermediate joint and the tip.
    pub fn chain(&self, joints: &Joints2R) -> PlanarChain {
        fk_2r(self.lengths.l1, self.lengths.l2, joints.q1, joints.q2)
    }
}

impl Kinematics for PlanarKinematics {
    type Joints = Joints2R;
    type Position = Position2;
    type Solution = Solution2R;

    fn forward(&self, joints: &Joints2R) -> Position2 {
        self.chain(joints).tip
    }

    fn inverse(&self, target: &Position2) -> Result<Solution2R, IkFailure> {
        ik_2r(self.lengths.l1, self.lengths.l2, target.x, target.y, self.elbow)
    }
}
