//! Polar arm: base yaw, elevation and a telescopic extension.
//!
//! There is no elbow, so inverse kinematics is direct and unique. Unlike the 3R arm,
//! the extension range is checked strictly: a target outside `[rho_min, rho_max]` is
//! rejected rather than approached.

use tracing::debug;

use crate::kinematic_traits::{IkFailure, JointsPolar, Kinematics, Position, SolutionPolar};
use crate::parameters::arm_kinematics::PolarParameters;
use crate::utils::{clamp, wrap_deg};

/// Forward kinematics of the polar arm. Yaw 0 points toward +z.
pub fn fk_polar(theta: f64, phi: f64, rho: f64) -> Position {
    let radial = rho * phi.cos();
    Position::new(theta.sin() * radial, rho * phi.sin(), theta.cos() * radial)
}

/// Inverse kinematics of the polar arm. Negative `y` is treated as lying on the floor.
/// Theta comes out in (-π, π]; see [`PolarKinematics`] for wrapping into a theta window.
pub fn ik_polar(
    rho_min: f64, rho_max: f64, x: f64, y: f64, z: f64,
) -> Result<SolutionPolar, IkFailure> {
    let y_clamped = y.max(0.0);
    let r = x.hypot(z);
    let s = r.hypot(y_clamped);
    if s < rho_min {
        debug!("polar target at {:.4} closer than rho_min {:.4}", s, rho_min);
        return Err(IkFailure::InsideDeadZone);
    }
    if s > rho_max {
        debug!("polar target at {:.4} further than rho_max {:.4}", s, rho_max);
        return Err(IkFailure::BeyondReach);
    }

    let theta = x.atan2(z);
    let phi = y_clamped.atan2(r);
    let rho = clamp(s, rho_min, rho_max);
    let y_tip = s * phi.sin();
    if y_tip < 0.0 {
        return Err(IkFailure::BelowFloor);
    }
    Ok(SolutionPolar { joints: JointsPolar::new(theta, phi, rho), y_tip })
}

/// The polar arm as a [`Kinematics`] implementation. Solutions have theta wrapped into the
/// window configured in the parameters.
#[derive(Debug, Clone, Copy)]
pub struct PolarKinematics {
    pub parameters: PolarParameters,
}

impl PolarKinematics {
    pub fn new(parameters: PolarParameters) -> Self {
        PolarKinematics { parameters }
    }

    /// Brings theta into the theta window, clamps phi into [0°, 90°] and rho into the band.
    pub fn limit(&self, joints: &JointsPolar) -> JointsPolar {
        let p = &self.parameters;
        JointsPolar {
            theta: wrap_deg(joints.theta.to_degrees(), p.theta_from).to_radians(),
            phi: clamp(joints.phi, 0.0, std::f64::consts::FRAC_PI_2),
            rho: clamp(joints.rho, p.rho_min, p.rho_max),
        }
    }
}

impl Kinematics for PolarKinematics {
    type Joints = JointsPolar;
    type Position = Position;
    type Solution = SolutionPolar;

    fn forward(&self, joints: &JointsPolar) -> Position {
        fk_polar(joints.theta, joints.phi, joints.rho)
    }

    fn inverse(&self, target: &Position) -> Result<SolutionPolar, IkFailure> {
        let p = &self.parameters;
        let mut solution = ik_polar(p.rho_min, p.rho_max, target.x, target.y, target.z)?;
        solution.joints.theta = wrap_deg(solution.joints.theta.to_degrees(), p.theta_from).to_radians();
        Ok(solution)
    }
}
