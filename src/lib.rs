//! Rust implementation of the forward and inverse kinematics behind an interactive robot arm
//! simulator, together with the animation and session logic that drives it.
//!
//! Three arms are modelled, all standing on a floor at `y = 0` with `y` pointing up:
//!
//! - **3R arm**: base yaw, shoulder pitch and elbow, upper arm `L1` and forearm `L2`.
//! - **Polar arm**: base yaw, elevation and a telescopic extension limited to
//!   `[rho_min, rho_max]`.
//! - **Planar 2R arm**: two revolute joints in a vertical plane.
//!
//! # Features
//!
//! - Closed form inverse kinematics for all arms. The 3R solver tries both elbow
//!   configurations, drops the ones that put the elbow or the tip below the floor, and
//!   prefers the higher elbow (with a small bias toward the preferred elbow sign).
//! - Failures carry their cause: beyond reach, inside the inner dead zone, or below the floor.
//! - Time based animations with cubic easing, either of the Cartesian target or of the
//!   joints, advanced from the frame callback of the host.
//! - [`session::Session`] and [`session_2d::PlanarSession`] hold the complete simulator
//!   state and implement every user interaction on top of the solvers.
//! - Optional loading of the simulator configuration from YAML (feature `allow_filesystem`).
//!
//! # Units
//!
//! Lengths are meters and angles are radians in every type of this crate. Millimeters and
//! degrees are only used at the presentation boundary, see [`utils`].
//!
//! ```
//! use rs_arm_kinematics::kinematic_traits::{Joints3R, Kinematics};
//! use rs_arm_kinematics::kinematics_impl::ThreeRKinematics;
//! use rs_arm_kinematics::parameters::arm_kinematics::LinkLengths;
//!
//! let robot = ThreeRKinematics::new(LinkLengths::teaching_3r());
//! let tip = robot.forward(&Joints3R::from_degrees(10.0, 30.0, 15.0));
//! let solution = robot.inverse(&tip).expect("pose of the arm is reachable");
//! assert!((robot.forward(&solution.joints) - tip).norm() < 1e-6);
//! ```

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;
pub mod parameter_error;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;

pub mod polar;
pub mod planar;

pub mod animation;

pub mod session;
pub mod session_2d;

#[cfg(test)]
mod tests;
