#[cfg(test)]
mod tests {
    use crate::animation::AnimationKind;
    use crate::kinematic_traits::{Elbow, IkFailure, IkSolution, Kinematics, Position};
    use crate::kinematics_impl::ThreeRKinematics;
    use crate::parameters::arm_kinematics::{LinkLengths, SimulatorConfig};
    use crate::session::{Axis, Joint3R, JointPolar, Playback, RobotType, Session, SessionError};

    const EPSILON: f64 = 1e-9;

    fn session() -> Session {
        Session::new(&SimulatorConfig::default()).expect("default configuration is valid")
    }

    fn opposite(p: Position) -> Position {
        Position::new(-p.x, p.y, -p.z)
    }

    #[test]
    fn test_starts_idle_with_target_on_tip() {
        let s = session();
        assert_eq!(s.robot_type(), RobotType::ThreeR);
        assert_eq!(s.playback(), Playback::Idle);
        assert!(!s.is_animating());
        assert!((s.target() - s.tip()).norm() < EPSILON);
        let [q1, q2, q3] = s.joints_3r().to_display_degrees();
        assert!((q1 - 10.0).abs() < 1e-9 && (q2 - 30.0).abs() < 1e-9 && (q3 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let config = SimulatorConfig { arm_3r: LinkLengths::new(-0.1, 0.4), ..Default::default() };
        assert!(Session::new(&config).is_err());
    }

    #[test]
    fn test_cartesian_animation_moves_only_the_target() {
        let mut s = session();
        let start = s.target();
        let joints = s.joints_3r();
        s.animate_to_opposite(1000.0).expect("idle");
        assert!(s.is_animating());
        assert_eq!(s.animation_kind(), Some(AnimationKind::CartesianLerp));

        assert!(s.tick(1000.0));
        assert!((s.target() - start).norm() < EPSILON);

        assert!(s.tick(1400.0));
        let middle = s.target();
        assert!(middle.x.abs() < EPSILON && middle.z.abs() < EPSILON);
        assert!((middle.y - start.y).abs() < EPSILON);

        assert!(!s.tick(1800.0));
        assert!((s.target() - opposite(start)).norm() < EPSILON);
        assert_eq!(s.joints_3r(), joints);
        assert_eq!(s.playback(), Playback::Idle);

        // Nothing left to advance
        assert!(!s.tick(2000.0));
    }

    #[test]
    fn test_inputs_refused_while_animating() {
        let mut s = session();
        s.animate_to_opposite(0.0).expect("idle");

        assert!(matches!(s.set_joint_3r(Joint3R::Yaw, 90.0), Err(SessionError::Busy)));
        assert!(matches!(s.solve_ik(Position::new(0.0, 0.3, 0.5)), Err(SessionError::Busy)));
        assert!(matches!(s.toggle_robot_type(), Err(SessionError::Busy)));
        assert!(matches!(s.set_link_lengths_mm(300.0, 300.0), Err(SessionError::Busy)));
        assert!(matches!(s.animate_joints_to_opposite(10.0), Err(SessionError::Busy)));
        assert!(matches!(s.drag_on_floor(0.1, 0.1), Err(SessionError::Busy)));
        assert!(matches!(s.apply_calculation(), Err(SessionError::Busy)));

        s.cancel_animation();
        assert!(!s.is_animating());
        s.set_joint_3r(Joint3R::Yaw, 90.0).expect("idle again");
    }

    #[test]
    fn test_joint_animation_3r_reaches_opposite() {
        let mut s = session();
        let end = opposite(s.target());
        s.animate_joints_to_opposite(0.0).expect("opposite is reachable");
        assert_eq!(s.animation_kind(), Some(AnimationKind::JointLerp));

        let mut now = 0.0;
        while s.tick(now) {
            // Target keeps following the tip on every frame
            assert!((s.target() - s.tip()).norm() < EPSILON || s.tip().y < 0.0);
            now += 16.0;
        }
        assert!(now >= 800.0);
        assert!((s.tip() - end).norm() < 1e-6);
        assert!((s.target() - end).norm() < 1e-6);
        let [q1, _, _] = s.joints_3r().to_display_degrees();
        assert!((q1 - 190.0).abs() < 1e-6, "yaw was {}", q1);
    }

    #[test]
    fn test_joint_animation_polar_reaches_opposite() {
        let mut s = session();
        assert_eq!(s.toggle_robot_type().expect("idle"), RobotType::Polar);
        assert!((s.target() - s.tip()).norm() < EPSILON);
        let end = opposite(s.target());

        s.animate_joints_to_opposite(0.0).expect("opposite is reachable");
        assert!(s.tick(400.0));
        assert!(!s.tick(800.0));
        assert!((s.tip() - end).norm() < 1e-6);
        assert!((s.theta_degrees() + 170.0).abs() < 1e-6, "theta was {}", s.theta_degrees());
    }

    #[test]
    fn test_joint_animation_not_started_when_unreachable() {
        let mut s = session();
        s.set_target_field(Axis::Z, 5.0).expect("idle");
        assert!(matches!(s.animate_joints_to_opposite(0.0),
                         Err(SessionError::Ik(IkFailure::BeyondReach))));
        assert_eq!(s.playback(), Playback::Idle);
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut s = session();
        s.set_animation_duration_ms(0.0).expect("idle");
        let end = opposite(s.target());
        s.animate_to_opposite(50.0).expect("idle");
        assert!(!s.tick(50.0));
        assert!((s.target() - end).norm() < EPSILON);
        assert!(!s.is_animating());
    }

    #[test]
    fn test_set_joint_3r_floor_and_ranges() {
        let mut s = session();

        s.set_joint_3r(Joint3R::Yaw, 370.0).expect("yaw is free");
        assert!((s.joints_3r().to_display_degrees()[0] - 10.0).abs() < 1e-9);

        // Clamped to 0°, the tip stays above the floor
        s.set_joint_3r(Joint3R::Shoulder, -20.0).expect("valid");
        assert!(s.joints_3r().q2.abs() < 1e-12);
        s.set_joint_3r(Joint3R::Shoulder, 30.0).expect("valid");

        let before = s.joints_3r();
        let target = s.target();
        assert!(matches!(s.set_joint_3r(Joint3R::Elbow, 300.0), Err(SessionError::BelowFloor)));
        assert_eq!(s.joints_3r(), before);
        assert_eq!(s.target(), target);

        s.set_joint_3r(Joint3R::Elbow, 45.0).expect("valid");
        assert!((s.target() - s.tip()).norm() < EPSILON);
    }

    #[test]
    fn test_set_joint_polar_limits() {
        let mut s = session();
        s.toggle_robot_type().expect("idle");

        s.set_joint_polar(JointPolar::Phi, 120.0).expect("valid");
        assert!((s.joints_polar().phi.to_degrees() - 90.0).abs() < 1e-9);
        s.set_joint_polar(JointPolar::Rho, 5.0).expect("valid");
        assert_eq!(s.joints_polar().rho, s.polar_parameters().rho_max);
        s.set_joint_polar(JointPolar::Theta, 190.0).expect("valid");
        assert!((s.theta_degrees() + 170.0).abs() < 1e-9);
        assert!((s.target() - s.tip()).norm() < EPSILON);
    }

    #[test]
    fn test_rho_band_change_pulls_extension_in() {
        let mut s = session();
        s.toggle_robot_type().expect("idle");
        s.set_rho_band_mm(100.0, 300.0).expect("valid band");
        assert!((s.joints_polar().rho - 0.3).abs() < EPSILON);
        assert!((s.target() - s.tip()).norm() < EPSILON);

        assert!(matches!(s.set_rho_band_mm(300.0, 100.0), Err(SessionError::Parameter(_))));
        assert!((s.polar_parameters().rho_max - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_link_lengths_keep_the_target() {
        let mut s = session();
        let target = s.target();
        s.set_link_lengths_mm(500.0, 300.0).expect("valid");
        assert_eq!(s.link_lengths(), LinkLengths::new(0.5, 0.3));
        assert_eq!(s.target(), target);
        assert!(matches!(s.set_link_lengths_mm(f64::NAN, 300.0), Err(SessionError::Parameter(_))));
    }

    #[test]
    fn test_solve_ik() {
        let mut s = session();
        s.solve_ik(Position::new(0.3, -0.1, 0.3)).expect("reachable on the floor");
        assert_eq!(s.target(), Position::new(0.3, 0.0, 0.3));
        assert!((s.tip() - s.target()).norm() < 1e-6);

        let joints = s.joints_3r();
        let target = s.target();
        assert!(matches!(s.solve_ik(Position::new(0.0, 0.0, 2.0)),
                         Err(SessionError::Ik(IkFailure::BeyondReach))));
        assert_eq!(s.joints_3r(), joints);
        assert_eq!(s.target(), target);
    }

    #[test]
    fn test_solve_ik_folded_on_floor_reaches_target() {
        let config = SimulatorConfig { arm_3r: LinkLengths::new(0.25, 0.5), ..Default::default() };
        let target = Position::new(0.0, 0.0, 0.25);
        for elbow in Elbow::BOTH {
            let mut s = Session::new(&config).expect("valid configuration");
            s.set_preferred_elbow(elbow).expect("idle");
            s.solve_ik(target).expect("on the inner reach circle");
            assert!((s.tip() - target).norm() < 1e-6, "tip at {:?}", s.tip());
            assert!((s.joints_3r().to_display_degrees()[1] - 180.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_drag_moves_target_even_when_unreachable() {
        let mut s = session();
        let joints = s.joints_3r();
        assert!(s.drag_target(Position::new(0.0, 1.5, 0.0)).is_err());
        assert_eq!(s.target(), Position::new(0.0, 1.5, 0.0));
        assert_eq!(s.joints_3r(), joints);

        s.set_target_field(Axis::Y, 0.2).expect("idle");
        s.drag_on_floor(0.2, 0.4).expect("reachable");
        assert_eq!(s.target(), Position::new(0.2, 0.2, 0.4));
        assert!((s.tip() - s.target()).norm() < 1e-6);
    }

    #[test]
    fn test_calculate_and_apply() {
        let mut s = session();
        let joints = s.joints_3r();
        let target = Position::new(-0.2, 0.4, 0.1);
        let result = s.calculate(target);
        assert!(matches!(result, IkSolution::ThreeR(_)));
        assert_eq!(s.joints_3r(), joints);
        assert_eq!(s.last_calculation(), Some(result));

        s.apply_calculation().expect("successful calculation");
        assert!((s.tip() - target).norm() < 1e-6);
        assert!((s.target() - target).norm() < 1e-6);

        s.calculate(Position::new(3.0, 0.0, 0.0));
        assert!(matches!(s.apply_calculation(), Err(SessionError::Ik(IkFailure::BeyondReach))));

        // A result of the 3R arm does not apply to the polar one
        s.calculate(target);
        s.toggle_robot_type().expect("idle");
        assert!(matches!(s.apply_calculation(), Err(SessionError::NoCalculation)));
    }

    #[test]
    fn test_toggle_moves_target_to_the_active_tip() {
        let mut s = session();
        let tip_3r = s.tip();
        s.toggle_robot_type().expect("idle");
        assert!((s.target() - s.tip()).norm() < EPSILON);
        assert!((s.target() - tip_3r).norm() > 1e-3);
        assert_eq!(s.toggle_robot_type().expect("idle"), RobotType::ThreeR);
        assert!((s.target() - tip_3r).norm() < EPSILON);
    }

    #[test]
    fn test_session_matches_free_kinematics() {
        let s = session();
        let robot = ThreeRKinematics::new(LinkLengths::teaching_3r());
        assert!((robot.forward(&s.joints_3r()) - s.tip()).norm() < EPSILON);
        assert!(s.elbow_position().y > 0.0);
    }
}
