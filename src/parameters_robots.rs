//! Hardcoded parameters for the simulated arms

pub mod arm_kinematics {
    use crate::kinematic_traits::{Elbow, Joints2R, Joints3R, JointsPolar};
    use crate::parameters::arm_kinematics::{LinkLengths, PolarParameters, SimulatorConfig};

    #[allow(dead_code)]
    impl LinkLengths {
        /// The spatial 3R arm of the simulator: 350 mm upper arm, 400 mm forearm.
        pub fn teaching_3r() -> Self {
            LinkLengths { l1: 0.35, l2: 0.40 }
        }

        /// The planar arm of the simulator: 250 mm and 180 mm.
        pub fn teaching_2r() -> Self {
            LinkLengths { l1: 0.25, l2: 0.18 }
        }

        /// Equal links, no inner dead zone: the arm can fold onto its own base.
        pub fn equal_links() -> Self {
            LinkLengths { l1: 0.40, l2: 0.40 }
        }
    }

    impl Default for PolarParameters {
        fn default() -> Self {
            PolarParameters { rho_min: 0.05, rho_max: 0.90, theta_from: -180.0 }
        }
    }

    impl Default for SimulatorConfig {
        fn default() -> Self {
            SimulatorConfig {
                arm_3r: LinkLengths::teaching_3r(),
                elbow_3r: Elbow::Positive,
                joints_3r: Joints3R::from_degrees(10.0, 30.0, 15.0),

                polar: PolarParameters::default(),
                joints_polar: JointsPolar::from_degrees(10.0, 25.0, 0.45),

                arm_2r: LinkLengths::teaching_2r(),
                elbow_2r: Elbow::Positive,
                joints_2r: Joints2R::from_degrees(20.0, 30.0),

                animation_duration_ms: 800.0,
            }
        }
    }
}
