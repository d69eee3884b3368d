//! Types shared by all arms: positions, joint sets, solutions and the [`Kinematics`] trait.
//!
//! Lengths are in meters and angles in radians everywhere inside this crate. Degrees and
//! millimeters only appear at the presentation boundary (see the `from_degrees` /
//! `to_degrees` helpers and [`crate::utils`]).
//!
//! The vertical axis is `y`. Yaw rotates about it, with yaw 0 pointing toward `+z`.

extern crate nalgebra as na;

use std::fmt;
use crate::utils::{clamp, norm_deg_360};

/// Cartesian position of the end effector (or of a target), meters, `y` up.
pub type Position = na::Vector3<f64>;

/// Position in the plane of the planar arm, meters, `y` up.
pub type Position2 = na::Vector2<f64>;

/// Selects one of the two configurations a two-link chain can use to reach the same point.
/// The sign is the sign of the sine of the elbow joint angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Elbow {
    #[default]
    Positive,
    Negative,
}

impl Elbow {
    pub fn sign(&self) -> f64 {
        match self {
            Elbow::Positive => 1.0,
            Elbow::Negative => -1.0,
        }
    }

    pub fn opposite(&self) -> Elbow {
        match self {
            Elbow::Positive => Elbow::Negative,
            Elbow::Negative => Elbow::Positive,
        }
    }

    /// Maps any non-negative number to `Positive` and a negative one to `Negative`.
    pub fn from_sign(sign: f64) -> Elbow {
        if sign < 0.0 { Elbow::Negative } else { Elbow::Positive }
    }

    /// Both signs, positive first. Candidate enumeration iterates in this order.
    pub const BOTH: [Elbow; 2] = [Elbow::Positive, Elbow::Negative];
}

impl fmt::Display for Elbow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elbow::Positive => write!(f, "+1"),
            Elbow::Negative => write!(f, "-1"),
        }
    }
}

/// Why inverse kinematics found no usable solution. The causes are kept apart even if the
/// user interface reports them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IkFailure {
    /// The target is further away than the arm can extend.
    BeyondReach,
    /// The target is too close: inside the inner annulus of a two link arm with unequal
    /// links, or closer than the minimal extension of the polar arm.
    InsideDeadZone,
    /// The target is reachable, but every configuration puts a link or joint below the floor.
    BelowFloor,
}

impl fmt::Display for IkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IkFailure::BeyondReach =>
                write!(f, "Target is beyond the maximal reach"),
            IkFailure::InsideDeadZone =>
                write!(f, "Target is inside the unreachable inner zone"),
            IkFailure::BelowFloor =>
                write!(f, "Every configuration reaching the target goes below the floor"),
        }
    }
}

impl std::error::Error for IkFailure {}

/// Joint values of the 3R arm (radians).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Joints3R {
    /// Base yaw.
    pub q1: f64,
    /// Shoulder pitch, measured up from the horizontal.
    pub q2: f64,
    /// Elbow, relative to the upper arm.
    pub q3: f64,
}

impl Joints3R {
    pub fn new(q1: f64, q2: f64, q3: f64) -> Self {
        Joints3R { q1, q2, q3 }
    }

    pub fn from_degrees(q1: f64, q2: f64, q3: f64) -> Self {
        Joints3R { q1: q1.to_radians(), q2: q2.to_radians(), q3: q3.to_radians() }
    }

    /// Degrees as the user sees them: q1 and q3 in [0, 360), q2 clamped to [0, 180].
    pub fn to_display_degrees(&self) -> [f64; 3] {
        [
            norm_deg_360(self.q1.to_degrees()),
            clamp(self.q2.to_degrees(), 0.0, 180.0),
            norm_deg_360(self.q3.to_degrees()),
        ]
    }

    /// Same angles, brought into the display ranges (still radians).
    pub fn normalized(&self) -> Self {
        let [q1, q2, q3] = self.to_display_degrees();
        Joints3R::from_degrees(q1, q2, q3)
    }
}

/// Joint values of the polar arm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointsPolar {
    /// Base yaw, radians.
    pub theta: f64,
    /// Elevation above the horizontal, radians.
    pub phi: f64,
    /// Extension, meters.
    pub rho: f64,
}

impl JointsPolar {
    pub fn new(theta: f64, phi: f64, rho: f64) -> Self {
        JointsPolar { theta, phi, rho }
    }

    /// Angles in degrees, extension in meters.
    pub fn from_degrees(theta: f64, phi: f64, rho: f64) -> Self {
        JointsPolar { theta: theta.to_radians(), phi: phi.to_radians(), rho }
    }

    /// `[theta°, phi°, rho]`
    pub fn to_degrees(&self) -> [f64; 3] {
        [self.theta.to_degrees(), self.phi.to_degrees(), self.rho]
    }
}

/// Joint values of the planar two link arm (radians).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Joints2R {
    pub q1: f64,
    pub q2: f64,
}

impl Joints2R {
    pub fn new(q1: f64, q2: f64) -> Self {
        Joints2R { q1, q2 }
    }

    pub fn from_degrees(q1: f64, q2: f64) -> Self {
        Joints2R { q1: q1.to_radians(), q2: q2.to_radians() }
    }

    pub fn to_degrees(&self) -> [f64; 2] {
        [self.q1.to_degrees(), self.q2.to_degrees()]
    }
}

/// Joint and tip positions of a planar two link chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarChain {
    /// Position of the joint between the two links.
    pub joint: Position2,
    /// Position of the end of the second link.
    pub tip: Position2,
}

/// Accepted solution of the 3R arm, with the heights used to filter it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution3R {
    /// Raw solver output, radians, not normalized.
    pub joints: Joints3R,
    pub elbow: Elbow,
    pub y_elbow: f64,
    pub y_tip: f64,
    /// Selection cost, lower is better.
    pub cost: f64,
}

/// Accepted solution of the polar arm. There is never more than one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionPolar {
    pub joints: JointsPolar,
    pub y_tip: f64,
}

/// Accepted solution of the planar 2R arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution2R {
    pub joints: Joints2R,
    pub elbow: Elbow,
    pub y_tip: f64,
}

/// Outcome of an inverse kinematics request, tagged by the arm that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IkSolution {
    ThreeR(Solution3R),
    Polar(SolutionPolar),
    TwoR(Solution2R),
    Unreachable(IkFailure),
}

impl IkSolution {
    pub fn is_ok(&self) -> bool {
        !matches!(self, IkSolution::Unreachable(_))
    }

    pub fn failure(&self) -> Option<IkFailure> {
        match self {
            IkSolution::Unreachable(cause) => Some(*cause),
            _ => None,
        }
    }
}

impl From<Result<Solution3R, IkFailure>> for IkSolution {
    fn from(result: Result<Solution3R, IkFailure>) -> Self {
        result.map_or_else(IkSolution::Unreachable, IkSolution::ThreeR)
    }
}

impl From<Result<SolutionPolar, IkFailure>> for IkSolution {
    fn from(result: Result<SolutionPolar, IkFailure>) -> Self {
        result.map_or_else(IkSolution::Unreachable, IkSolution::Polar)
    }
}

impl From<Result<Solution2R, IkFailure>> for IkSolution {
    fn from(result: Result<Solution2R, IkFailure>) -> Self {
        result.map_or_else(IkSolution::Unreachable, IkSolution::TwoR)
    }
}

/// Forward and inverse kinematics of one arm. Implementations are pure: they hold only
/// the geometric parameters of the arm and never mutate them.
pub trait Kinematics {
    type Joints: Copy;
    type Position: Copy;
    type Solution: Copy;

    /// Position of the end effector for the given joint values. Never fails.
    fn forward(&self, joints: &Self::Joints) -> Self::Position;

    /// Best joint configuration reaching the target, or the reason there is none.
    fn inverse(&self, target: &Self::Position) -> Result<Self::Solution, IkFailure>;
}
