//! Interactive session of the planar simulator: one 2R arm standing on the floor, a 2D
//! target and a calculator. Unlike [`crate::session::Session`] nothing is animated here.

use tracing::{debug, trace};

use crate::kinematic_traits::{
    Elbow, IkSolution, Joints2R, Kinematics, PlanarChain, Position2, Solution2R,
};
use crate::parameter_error::ParameterError;
use crate::parameters::arm_kinematics::{LinkLengths, SimulatorConfig};
use crate::planar::{tip_below_floor, PlanarKinematics};
use crate::session::SessionError;
use crate::utils::{clamp, mm_to_m, wrap_deg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint2R {
    Shoulder,
    Elbow,
}

#[derive(Debug, Clone)]
pub struct PlanarSession {
    arm: PlanarKinematics,
    joints: Joints2R,
    target: Position2,
    last_calculation: Option<IkSolution>,
}

fn on_or_above_floor(p: Position2) -> Position2 {
    Position2::new(p.x, p.y.max(0.0))
}

/// Both joints in [-180°, 180°).
fn wrapped(joints: &Joints2R) -> Joints2R {
    let [q1, q2] = joints.to_degrees();
    Joints2R::from_degrees(wrap_deg(q1, -180.0), wrap_deg(q2, -180.0))
}

impl PlanarSession {
    /// Planar arm of the configuration, target on its tip.
    pub fn new(config: &SimulatorConfig) -> Result<Self, ParameterError> {
        config.validate()?;
        let arm = PlanarKinematics::new(config.arm_2r, config.elbow_2r);
        let joints = config.joints_2r;
        Ok(PlanarSession {
            target: on_or_above_floor(arm.forward(&joints)),
            arm,
            joints,
            last_calculation: None,
        })
    }

    pub fn joints(&self) -> Joints2R {
        self.joints
    }

    pub fn target(&self) -> Position2 {
        self.target
    }

    pub fn link_lengths(&self) -> LinkLengths {
        self.arm.lengths
    }

    pub fn preferred_elbow(&self) -> Elbow {
        self.arm.elbow
    }

    pub fn last_calculation(&self) -> Option<IkSolution> {
        self.last_calculation
    }

    /// Joint and tip, for drawing the arm.
    pub fn chain(&self) -> PlanarChain {
        self.arm.chain(&self.joints)
    }

    fn follow_tip(&mut self) {
        self.target = on_or_above_floor(self.arm.forward(&self.joints));
    }

    pub fn set_preferred_elbow(&mut self, elbow: Elbow) {
        self.arm.elbow = elbow;
    }

    /// Sets both links, in millimeters. Joints and target stay. Refused if the current joints
    /// would put the tip below the floor with the new lengths.
    pub fn set_link_lengths_mm(&mut self, l1_mm: f64, l2_mm: f64) -> Result<(), SessionError> {
        let lengths = LinkLengths::new(mm_to_m(l1_mm), mm_to_m(l2_mm));
        lengths.validate()?;
        if tip_below_floor(lengths.l1, lengths.l2, &self.joints) {
            trace!("links {} mm, {} mm would put the tip below the floor", l1_mm, l2_mm);
            return Err(SessionError::BelowFloor);
        }
        self.arm.lengths = lengths;
        Ok(())
    }

    /// Sets one joint in degrees, limited to [-180°, 180°]. Refused if the tip would end up
    /// below the floor; otherwise the target follows the tip.
    pub fn set_joint(&mut self, joint: Joint2R, degrees: f64) -> Result<(), SessionError> {
        let value = clamp(degrees, -180.0, 180.0).to_radians();
        let mut joints = self.joints;
        match joint {
            Joint2R::Shoulder => joints.q1 = value,
            Joint2R::Elbow => joints.q2 = value,
        }
        if tip_below_floor(self.arm.lengths.l1, self.arm.lengths.l2, &joints) {
            trace!("{:?} at {}° would put the tip below the floor", joint, degrees);
            return Err(SessionError::BelowFloor);
        }
        self.joints = joints;
        self.follow_tip();
        Ok(())
    }

    /// Moves the target without solving, height kept ≥ 0.
    pub fn set_target(&mut self, x: f64, y: f64) {
        self.target = on_or_above_floor(Position2::new(x, y));
    }

    /// Pointer click in the plane of the arm.
    pub fn click_to_target(&mut self, x: f64, y: f64) {
        self.set_target(x, y);
    }

    fn apply(&mut self, solution: &Solution2R) {
        self.joints = wrapped(&solution.joints);
        self.follow_tip();
    }

    /// Solves for the current target with the preferred elbow and moves the arm there.
    /// On failure nothing changes.
    pub fn go_to_target(&mut self) -> Result<(), SessionError> {
        let solution = self.arm.inverse(&self.target).inspect_err(|cause| {
            debug!("planar target unreachable: {}", cause);
        })?;
        self.apply(&solution);
        Ok(())
    }

    /// Solves without moving the arm. The result is kept for
    /// [`PlanarSession::apply_calculation`].
    pub fn calculate(&mut self, x: f64, y: f64) -> IkSolution {
        let solution: IkSolution = self.arm.inverse(&Position2::new(x, y)).into();
        self.last_calculation = Some(solution);
        solution
    }

    /// Applies the last calculation. Links may have changed since, so the floor is checked
    /// again with the current lengths.
    pub fn apply_calculation(&mut self) -> Result<(), SessionError> {
        match self.last_calculation {
            Some(IkSolution::TwoR(solution)) => {
                if tip_below_floor(self.arm.lengths.l1, self.arm.lengths.l2, &solution.joints) {
                    trace!("calculated joints would put the tip below the floor");
                    return Err(SessionError::BelowFloor);
                }
                self.apply(&solution);
                Ok(())
            }
            Some(IkSolution::Unreachable(cause)) => Err(SessionError::Ik(cause)),
            _ => Err(SessionError::NoCalculation),
        }
    }
}
