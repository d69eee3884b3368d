#[cfg(test)]
mod tests {
    use crate::kinematic_traits::{Elbow, Joints2R};
    use crate::parameter_error::ParameterError;
    use crate::parameters::arm_kinematics::{LinkLengths, SimulatorConfig};

    const READ_ERROR: &'static str = "Failed to load simulator configuration";
    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_config_from_yaml() {
        let filename = "src/tests/data/simulator.yaml";
        let loaded = SimulatorConfig::from_yaml_file(filename).expect(READ_ERROR);

        assert_eq!(loaded.arm_3r, LinkLengths::new(0.3, 0.45));
        assert_eq!(loaded.elbow_3r, Elbow::Negative);
        assert!((loaded.joints_3r.q1 - 45.0_f64.to_radians()).abs() < EPSILON);
        assert!((loaded.joints_3r.q2 - 60.0_f64.to_radians()).abs() < EPSILON);
        assert!((loaded.joints_3r.q3 - 0.5).abs() < EPSILON);

        assert_eq!(loaded.polar.rho_min, 0.1);
        assert_eq!(loaded.polar.rho_max, 0.6);
        assert_eq!(loaded.polar.theta_from, 0.0);
        let [theta, phi, rho] = loaded.joints_polar.to_degrees();
        assert!((theta - 90.0).abs() < EPSILON && (phi - 30.0).abs() < EPSILON);
        assert_eq!(rho, 0.4);

        assert_eq!(loaded.arm_2r, LinkLengths::new(0.2, 0.2));
        // Not in the file, default kept
        assert_eq!(loaded.elbow_2r, Elbow::Positive);
        assert_eq!(loaded.joints_2r, Joints2R::from_degrees(30.0, -45.0));
        assert_eq!(loaded.animation_duration_ms, 1200.0);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let loaded = SimulatorConfig::from_yaml_file("src/tests/data/partial.yaml")
            .expect(READ_ERROR);
        let expected = SimulatorConfig { elbow_2r: Elbow::Negative, ..SimulatorConfig::default() };
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(SimulatorConfig::from_yaml_str("").expect(READ_ERROR), SimulatorConfig::default());
        assert_eq!(SimulatorConfig::from_yaml_str("~").expect(READ_ERROR), SimulatorConfig::default());
    }

    #[test]
    fn test_wrong_unit_is_reported() {
        let result = SimulatorConfig::from_yaml_file("src/tests/data/bad_unit.yaml");
        assert!(matches!(result, Err(ParameterError::WrongUnit(_))), "got {:?}", result);

        let result = SimulatorConfig::from_yaml_str("arm_2r:\n  joints: [mm(10), 20]\n");
        assert!(matches!(result, Err(ParameterError::WrongUnit(_))), "got {:?}", result);
    }

    #[test]
    fn test_invalid_configs() {
        let cases = [
            "unknown_arm:\n  l1: 0.3\n",
            "arm_3r:\n  l1: mm(abc)\n",
            "arm_3r:\n  joints: 45\n",
            "arm_3r: [1, 2]\n",
        ];
        for yaml in cases {
            let result = SimulatorConfig::from_yaml_str(yaml);
            assert!(matches!(result, Err(ParameterError::ParseError(_))), "{:?} gave {:?}", yaml, result);
        }

        let cases = [
            "polar:\n  rho_min: mm(500)\n  rho_max: mm(400)\n",
            "arm_2r:\n  joints: [1, 2, 3]\n",
            "arm_3r:\n  l2: -0.4\n",
            "arm_3r:\n  preferred_elbow: 0\n",
            "polar:\n  joints: [0, 0, mm(20)]\n",
            "animation_duration_ms: -5\n",
        ];
        for yaml in cases {
            let result = SimulatorConfig::from_yaml_str(yaml);
            assert!(matches!(result, Err(ParameterError::InvalidValue(_))), "{:?} gave {:?}", yaml, result);
        }
    }

    #[test]
    fn test_missing_file() {
        let result = SimulatorConfig::from_yaml_file("src/tests/data/no_such_file.yaml");
        assert!(matches!(result, Err(ParameterError::IoError(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let first = SimulatorConfig::from_yaml_file("src/tests/data/simulator.yaml")
            .expect(READ_ERROR);
        let yaml = first.to_yaml();
        let reloaded = SimulatorConfig::from_yaml_str(&yaml)
            .unwrap_or_else(|e| panic!("cannot read back {}: {}", yaml, e));

        assert!((reloaded.arm_3r.l1 - first.arm_3r.l1).abs() < EPSILON);
        assert!((reloaded.arm_3r.l2 - first.arm_3r.l2).abs() < EPSILON);
        assert_eq!(reloaded.elbow_3r, first.elbow_3r);
        assert!((reloaded.joints_3r.q3 - first.joints_3r.q3).abs() < 1e-9);
        assert!((reloaded.polar.rho_max - first.polar.rho_max).abs() < EPSILON);
        assert!((reloaded.joints_polar.rho - first.joints_polar.rho).abs() < EPSILON);
        assert!((reloaded.joints_2r.q2 - first.joints_2r.q2).abs() < 1e-9);
        assert_eq!(reloaded.animation_duration_ms, first.animation_duration_ms);
    }
}
