//! Defines the arm parameter data structures

pub mod arm_kinematics {
    use crate::kinematic_traits::{Elbow, Joints2R, Joints3R, JointsPolar};
    use crate::parameter_error::ParameterError;
    use crate::utils::mm;

    /// Lengths of the two links of a two link chain (meters). Used both for the 3R arm
    /// (upper arm and forearm above the yaw joint) and for the planar arm.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct LinkLengths {
        /// From the shoulder to the elbow.
        pub l1: f64,
        /// From the elbow to the tip.
        pub l2: f64,
    }

    impl LinkLengths {
        pub fn new(l1: f64, l2: f64) -> Self {
            LinkLengths { l1, l2 }
        }

        /// Both lengths must be positive and finite.
        pub fn validate(&self) -> Result<(), ParameterError> {
            for (name, value) in [("l1", self.l1), ("l2", self.l2)] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ParameterError::InvalidValue(format!(
                        "link length '{}' must be positive and finite (got {})", name, value
                    )));
                }
            }
            Ok(())
        }

        /// Radius of the outer boundary of the reach annulus.
        pub fn max_reach(&self) -> f64 {
            self.l1 + self.l2
        }

        /// Radius of the inner boundary of the reach annulus, 0 for equal links.
        pub fn min_reach(&self) -> f64 {
            (self.l1 - self.l2).abs()
        }
    }

    /// Geometry of the polar arm.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct PolarParameters {
        /// Shortest extension, meters.
        pub rho_min: f64,
        /// Longest extension, meters.
        pub rho_max: f64,
        /// Start of the 360° window theta is reported in, degrees. -180 gives [-180, 180).
        pub theta_from: f64,
    }

    impl PolarParameters {
        pub fn new(rho_min: f64, rho_max: f64) -> Self {
            PolarParameters { rho_min, rho_max, ..Self::default() }
        }

        /// Requires `0 < rho_min < rho_max`, all finite.
        pub fn validate(&self) -> Result<(), ParameterError> {
            if !(self.rho_min.is_finite() && self.rho_max.is_finite() && self.theta_from.is_finite()) {
                return Err(ParameterError::InvalidValue(format!(
                    "polar parameters must be finite (rho {}..{}, theta from {})",
                    self.rho_min, self.rho_max, self.theta_from
                )));
            }
            if self.rho_min <= 0.0 || self.rho_min >= self.rho_max {
                return Err(ParameterError::InvalidValue(format!(
                    "extension band must satisfy 0 < rho_min < rho_max (got {}..{})",
                    self.rho_min, self.rho_max
                )));
            }
            Ok(())
        }
    }

    /// Everything the simulator can be configured with: arm geometry, starting poses,
    /// elbow preferences and animation timing.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct SimulatorConfig {
        pub arm_3r: LinkLengths,
        pub elbow_3r: Elbow,
        pub joints_3r: Joints3R,

        pub polar: PolarParameters,
        pub joints_polar: JointsPolar,

        pub arm_2r: LinkLengths,
        pub elbow_2r: Elbow,
        pub joints_2r: Joints2R,

        /// Duration of the "move to opposite" animations, milliseconds.
        pub animation_duration_ms: f64,
    }

    impl SimulatorConfig {
        pub fn validate(&self) -> Result<(), ParameterError> {
            self.arm_3r.validate()?;
            self.arm_2r.validate()?;
            self.polar.validate()?;
            let rho = self.joints_polar.rho;
            if !(rho >= self.polar.rho_min && rho <= self.polar.rho_max) {
                return Err(ParameterError::InvalidValue(format!(
                    "initial extension {} is outside {}..{}",
                    rho, self.polar.rho_min, self.polar.rho_max
                )));
            }
            let angles = [
                self.joints_3r.q1, self.joints_3r.q2, self.joints_3r.q3,
                self.joints_polar.theta, self.joints_polar.phi,
                self.joints_2r.q1, self.joints_2r.q2,
            ];
            if !crate::utils::is_valid(&angles) {
                return Err(ParameterError::InvalidValue("initial joint angles must be finite".into()));
            }
            if !(self.animation_duration_ms.is_finite() && self.animation_duration_ms >= 0.0) {
                return Err(ParameterError::InvalidValue(format!(
                    "animation duration must be a non-negative number of milliseconds (got {})",
                    self.animation_duration_ms
                )));
            }
            Ok(())
        }

        /// Convert to string yaml representation (quick viewing, etc).
        /// Lengths are written as `mm(..)`, angles in degrees.
        pub fn to_yaml(&self) -> String {
            let [q1, q2, q3] = self.joints_3r.to_display_degrees();
            let [theta, phi, rho] = self.joints_polar.to_degrees();
            let [p1, p2] = self.joints_2r.to_degrees();
            format!(
                "arm_3r:\n  \
                   l1: {}\n  \
                   l2: {}\n  \
                   preferred_elbow: {}\n  \
                   joints: [{}, {}, {}]\n\
                 polar:\n  \
                   rho_min: {}\n  \
                   rho_max: {}\n  \
                   theta_from: {}\n  \
                   joints: [{}, {}, {}]\n\
                 arm_2r:\n  \
                   l1: {}\n  \
                   l2: {}\n  \
                   preferred_elbow: {}\n  \
                   joints: [{}, {}]\n\
                 animation_duration_ms: {}\n",
                mm(self.arm_3r.l1), mm(self.arm_3r.l2), self.elbow_3r.sign(), q1, q2, q3,
                mm(self.polar.rho_min), mm(self.polar.rho_max), self.polar.theta_from,
                theta, phi, mm(rho),
                mm(self.arm_2r.l1), mm(self.arm_2r.l2), self.elbow_2r.sign(), p1, p2,
                self.animation_duration_ms
            )
        }
    }
}
