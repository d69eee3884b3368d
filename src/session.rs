//! Interactive session of the 3D simulator: owns the mutable state (which arm is shown,
//! its geometry, its pose and the target marker) and drives the kinematics in response to
//! user input.
//!
//! The session never schedules anything itself. The host forwards input events to the
//! `set_*`, `drag_*`, `solve_ik` and `animate_*` methods and calls [`Session::tick`] from
//! its frame callback while [`Session::is_animating`] is true. While an animation runs,
//! every input that would change the pose is refused with [`SessionError::Busy`].

use std::fmt;

use tracing::{debug, trace};

use crate::animation::{AnimationKind, AnimationState};
use crate::kinematic_traits::{
    Elbow, IkFailure, IkSolution, Joints3R, JointsPolar, Kinematics, Position,
};
use crate::kinematics_impl::ThreeRKinematics;
use crate::parameter_error::ParameterError;
use crate::parameters::arm_kinematics::{LinkLengths, PolarParameters, SimulatorConfig};
use crate::polar::PolarKinematics;
use crate::utils::{clamp, mm_to_m, norm_deg_360, wrap_deg};

/// Which 3D arm is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotType {
    ThreeR,
    Polar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint3R {
    /// Base yaw, any angle, shown in [0°, 360°).
    Yaw,
    /// Limited to [0°, 180°].
    Shoulder,
    /// Any angle, shown in [0°, 360°).
    Elbow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointPolar {
    /// Degrees, wrapped into the theta window.
    Theta,
    /// Degrees, limited to [0°, 90°].
    Phi,
    /// Meters, limited to the extension band.
    Rho,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Why the session refused an input.
#[derive(Debug)]
pub enum SessionError {
    /// An animation is running.
    Busy,
    /// The change would put the arm below the floor.
    BelowFloor,
    /// There is no successful calculation for the active arm to apply.
    NoCalculation,
    Ik(IkFailure),
    Parameter(ParameterError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Busy => write!(f, "An animation is running"),
            SessionError::BelowFloor => write!(f, "The arm would go below the floor"),
            SessionError::NoCalculation => write!(f, "No calculated solution to apply"),
            SessionError::Ik(cause) => write!(f, "No solution: {}", cause),
            SessionError::Parameter(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Ik(cause) => Some(cause),
            SessionError::Parameter(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IkFailure> for SessionError {
    fn from(cause: IkFailure) -> Self {
        SessionError::Ik(cause)
    }
}

impl From<ParameterError> for SessionError {
    fn from(err: ParameterError) -> Self {
        SessionError::Parameter(err)
    }
}

/// A running animation, by what it drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Target(AnimationState<Position>),
    ThreeR(AnimationState<Joints3R>),
    Polar(AnimationState<JointsPolar>),
}

impl Motion {
    pub fn kind(&self) -> AnimationKind {
        match self {
            Motion::Target(a) => a.kind(),
            Motion::ThreeR(a) => a.kind(),
            Motion::Polar(a) => a.kind(),
        }
    }
}

/// Idle, or running exactly one animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Playback {
    Idle,
    Running(Motion),
}

/// State of the 3D simulator.
#[derive(Debug, Clone)]
pub struct Session {
    robot_type: RobotType,
    arm_3r: ThreeRKinematics,
    joints_3r: Joints3R,
    polar: PolarKinematics,
    joints_polar: JointsPolar,
    target: Position,
    last_calculation: Option<IkSolution>,
    playback: Playback,
    animation_duration_ms: f64,
}

/// The marker never goes below the floor.
fn on_or_above_floor(p: Position) -> Position {
    Position::new(p.x, p.y.max(0.0), p.z)
}

impl Session {
    /// Starts with the 3R arm active and the target on its tip.
    pub fn new(config: &SimulatorConfig) -> Result<Self, ParameterError> {
        config.validate()?;
        let arm_3r = ThreeRKinematics::with_preferred_elbow(config.arm_3r, config.elbow_3r);
        let polar = PolarKinematics::new(config.polar);
        let joints_3r = config.joints_3r.normalized();
        let joints_polar = polar.limit(&config.joints_polar);
        Ok(Session {
            robot_type: RobotType::ThreeR,
            target: on_or_above_floor(arm_3r.forward(&joints_3r)),
            arm_3r,
            joints_3r,
            polar,
            joints_polar,
            last_calculation: None,
            playback: Playback::Idle,
            animation_duration_ms: config.animation_duration_ms,
        })
    }

    pub fn robot_type(&self) -> RobotType {
        self.robot_type
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn joints_3r(&self) -> Joints3R {
        self.joints_3r
    }

    pub fn joints_polar(&self) -> JointsPolar {
        self.joints_polar
    }

    pub fn link_lengths(&self) -> LinkLengths {
        self.arm_3r.lengths
    }

    pub fn polar_parameters(&self) -> PolarParameters {
        self.polar.parameters
    }

    pub fn preferred_elbow(&self) -> Elbow {
        self.arm_3r.preferred_elbow
    }

    pub fn animation_duration_ms(&self) -> f64 {
        self.animation_duration_ms
    }

    /// Result of the last [`Session::calculate`], if any.
    pub fn last_calculation(&self) -> Option<IkSolution> {
        self.last_calculation
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.playback, Playback::Running(_))
    }

    pub fn animation_kind(&self) -> Option<AnimationKind> {
        match self.playback {
            Playback::Running(motion) => Some(motion.kind()),
            Playback::Idle => None,
        }
    }

    /// Tip of the active arm, from forward kinematics.
    pub fn tip(&self) -> Position {
        match self.robot_type {
            RobotType::ThreeR => self.arm_3r.forward(&self.joints_3r),
            RobotType::Polar => self.polar.forward(&self.joints_polar),
        }
    }

    /// Elbow of the 3R arm, for drawing it.
    pub fn elbow_position(&self) -> Position {
        self.arm_3r.elbow_position(&self.joints_3r)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_animating() {
            debug!("input refused while animating");
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn follow_tip(&mut self) {
        self.target = on_or_above_floor(self.tip());
    }

    /// Switches between the 3R and the polar arm. The target jumps to the tip of the
    /// arm now shown.
    pub fn toggle_robot_type(&mut self) -> Result<RobotType, SessionError> {
        self.ensure_idle()?;
        self.robot_type = match self.robot_type {
            RobotType::ThreeR => RobotType::Polar,
            RobotType::Polar => RobotType::ThreeR,
        };
        self.follow_tip();
        Ok(self.robot_type)
    }

    pub fn set_preferred_elbow(&mut self, elbow: Elbow) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.arm_3r.preferred_elbow = elbow;
        Ok(())
    }

    pub fn set_animation_duration_ms(&mut self, duration_ms: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        if !(duration_ms.is_finite() && duration_ms >= 0.0) {
            return Err(ParameterError::InvalidValue(format!(
                "animation duration must be a non-negative number of milliseconds (got {})",
                duration_ms
            )).into());
        }
        self.animation_duration_ms = duration_ms;
        Ok(())
    }

    /// Sets both links of the 3R arm, given in millimeters. Joints and target stay.
    pub fn set_link_lengths_mm(&mut self, l1_mm: f64, l2_mm: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let lengths = LinkLengths::new(mm_to_m(l1_mm), mm_to_m(l2_mm));
        lengths.validate()?;
        self.arm_3r.lengths = lengths;
        Ok(())
    }

    /// Sets the extension band of the polar arm, given in millimeters. The current
    /// extension is pulled into the new band.
    pub fn set_rho_band_mm(&mut self, min_mm: f64, max_mm: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let parameters = PolarParameters {
            rho_min: mm_to_m(min_mm),
            rho_max: mm_to_m(max_mm),
            ..self.polar.parameters
        };
        parameters.validate()?;
        self.polar.parameters = parameters;
        self.joints_polar = self.polar.limit(&self.joints_polar);
        if self.robot_type == RobotType::Polar {
            self.follow_tip();
        }
        Ok(())
    }

    /// Sets one 3R joint, in degrees. Changes of shoulder or elbow that would put the tip
    /// below the floor are refused.
    pub fn set_joint_3r(&mut self, joint: Joint3R, degrees: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let mut joints = self.joints_3r;
        match joint {
            Joint3R::Yaw => joints.q1 = norm_deg_360(degrees).to_radians(),
            Joint3R::Shoulder => joints.q2 = clamp(degrees, 0.0, 180.0).to_radians(),
            Joint3R::Elbow => joints.q3 = norm_deg_360(degrees).to_radians(),
        }
        if joint != Joint3R::Yaw && self.arm_3r.tip_below_floor(&joints) {
            trace!("{:?} at {}° would put the tip below the floor", joint, degrees);
            return Err(SessionError::BelowFloor);
        }
        self.joints_3r = joints;
        if self.robot_type == RobotType::ThreeR {
            self.follow_tip();
        }
        Ok(())
    }

    /// Sets one polar joint: theta and phi in degrees, rho in meters.
    pub fn set_joint_polar(&mut self, joint: JointPolar, value: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let mut joints = self.joints_polar;
        match joint {
            JointPolar::Theta => joints.theta = value.to_radians(),
            JointPolar::Phi => joints.phi = clamp(value, 0.0, 90.0).to_radians(),
            JointPolar::Rho => joints.rho = value,
        }
        self.joints_polar = self.polar.limit(&joints);
        if self.robot_type == RobotType::Polar {
            self.follow_tip();
        }
        Ok(())
    }

    /// Moves the target along one axis (meters) without solving. Height is kept ≥ 0.
    pub fn set_target_field(&mut self, axis: Axis, value: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        match axis {
            Axis::X => self.target.x = value,
            Axis::Y => self.target.y = value.max(0.0),
            Axis::Z => self.target.z = value,
        }
        Ok(())
    }

    /// Moves the whole target without solving. Height is kept ≥ 0.
    pub fn set_target(&mut self, target: Position) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.target = on_or_above_floor(target);
        Ok(())
    }

    fn solve(&self, target: &Position) -> IkSolution {
        match self.robot_type {
            RobotType::ThreeR => self.arm_3r.inverse(target).into(),
            RobotType::Polar => self.polar.inverse(target).into(),
        }
    }

    fn apply(&mut self, solution: &IkSolution) -> Result<(), SessionError> {
        match (self.robot_type, solution) {
            (RobotType::ThreeR, IkSolution::ThreeR(s)) => self.joints_3r = s.joints.normalized(),
            (RobotType::Polar, IkSolution::Polar(s)) => self.joints_polar = self.polar.limit(&s.joints),
            (_, IkSolution::Unreachable(cause)) => return Err(SessionError::Ik(*cause)),
            _ => return Err(SessionError::NoCalculation),
        }
        Ok(())
    }

    /// Solves for the target with the active arm and moves the arm there. The target is
    /// stored with its height clamped to the floor. On failure nothing changes.
    pub fn solve_ik(&mut self, target: Position) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let solution = self.solve(&target);
        self.apply(&solution)?;
        self.target = on_or_above_floor(target);
        Ok(())
    }

    /// Drag of the target marker: the marker always moves, then the arm follows if it can.
    pub fn drag_target(&mut self, position: Position) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.target = on_or_above_floor(position);
        self.solve_ik(self.target)
    }

    /// Drag on the floor plane: moves the target horizontally, keeping its height.
    pub fn drag_on_floor(&mut self, x: f64, z: f64) -> Result<(), SessionError> {
        let y = self.target.y;
        self.drag_target(Position::new(x, y, z))
    }

    /// Solves for the position without moving the arm. The result is kept for
    /// [`Session::apply_calculation`].
    pub fn calculate(&mut self, position: Position) -> IkSolution {
        let solution = self.solve(&position);
        self.last_calculation = Some(solution);
        solution
    }

    /// Moves the arm to the last calculated solution; the target follows the tip.
    pub fn apply_calculation(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let solution = self.last_calculation.ok_or(SessionError::NoCalculation)?;
        self.apply(&solution)?;
        self.follow_tip();
        Ok(())
    }

    fn start(&mut self, motion: Motion) {
        debug!("animation started: {:?}", motion.kind());
        self.playback = Playback::Running(motion);
    }

    /// Starts moving the target marker (only the marker) to its point reflection through
    /// the vertical axis.
    pub fn animate_to_opposite(&mut self, now_ms: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let start = self.target;
        let end = Position::new(-start.x, start.y, -start.z);
        self.start(Motion::Target(
            AnimationState::new(start, end, now_ms, self.animation_duration_ms)));
        Ok(())
    }

    /// Starts moving the joints of the active arm to the pose reaching the reflected
    /// target. If that target cannot be reached, no animation starts.
    pub fn animate_joints_to_opposite(&mut self, now_ms: f64) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let end = Position::new(-self.target.x, self.target.y, -self.target.z);
        let duration = self.animation_duration_ms;
        let motion = match self.solve(&end) {
            IkSolution::ThreeR(s) => Motion::ThreeR(AnimationState::new(
                self.joints_3r, s.joints.normalized(), now_ms, duration)),
            IkSolution::Polar(s) => Motion::Polar(AnimationState::new(
                self.joints_polar, self.polar.limit(&s.joints), now_ms, duration)),
            IkSolution::Unreachable(cause) => {
                debug!("opposite target unreachable: {}", cause);
                return Err(SessionError::Ik(cause));
            }
            IkSolution::TwoR(_) => return Err(SessionError::NoCalculation),
        };
        self.start(motion);
        Ok(())
    }

    /// Advances the running animation to `now_ms` and writes the result into the pose.
    /// Returns true while the animation still runs; false once it has finished (this call
    /// wrote the final value) or if nothing was running.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Playback::Running(motion) = self.playback else {
            return false;
        };
        let done = match motion {
            Motion::Target(animation) => {
                let (target, done) = animation.advance(now_ms);
                self.target = on_or_above_floor(target);
                done
            }
            Motion::ThreeR(animation) => {
                let (joints, done) = animation.advance(now_ms);
                self.joints_3r = joints.normalized();
                self.target = on_or_above_floor(self.arm_3r.forward(&self.joints_3r));
                done
            }
            Motion::Polar(animation) => {
                let (joints, done) = animation.advance(now_ms);
                self.joints_polar = self.polar.limit(&joints);
                self.target = on_or_above_floor(self.polar.forward(&self.joints_polar));
                done
            }
        };
        if done {
            debug!("animation finished");
            self.playback = Playback::Idle;
        }
        !done
    }

    /// Stops the running animation where it is (teardown of the host).
    pub fn cancel_animation(&mut self) {
        if self.is_animating() {
            debug!("animation cancelled");
        }
        self.playback = Playback::Idle;
    }

    /// Theta of the polar arm in degrees, in the configured window.
    pub fn theta_degrees(&self) -> f64 {
        wrap_deg(self.joints_polar.theta.to_degrees(), self.polar.parameters.theta_from)
    }
}
