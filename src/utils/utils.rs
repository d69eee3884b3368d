//! Helper functions: angle and unit conversions, interpolation, easing and printing.

use crate::kinematic_traits::{Joints2R, Joints3R, JointsPolar, Position, Position2};

/// Limits `x` to `[min, max]`. Unlike `f64::clamp`, never panics (also not on NaN bounds).
pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(x))
}

/// Linear interpolation, `t = 0` gives `a`, `t = 1` gives `b`. `t` is not limited.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic ease-in-out timing curve on [0, 1].
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Interpolates between two angles in degrees along the shorter arc, so 350° to 10° passes
/// through 0° rather than 180°. The result is normalized to [0, 360).
pub fn angle_lerp(a: f64, b: f64, t: f64) -> f64 {
    let d = (b - a + 180.0).rem_euclid(360.0) - 180.0;
    norm_deg_360(a + d * t)
}

/// Normalizes an angle in degrees to [0, 360).
pub fn norm_deg_360(deg: f64) -> f64 {
    let normalized = deg.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Wraps an angle in degrees into the window `[from, from + 360)`.
pub fn wrap_deg(deg: f64, from: f64) -> f64 {
    from + norm_deg_360(deg - from)
}

pub fn m_to_mm(m: f64) -> f64 {
    m * 1000.0
}

pub fn mm_to_m(mm: f64) -> f64 {
    mm / 1000.0
}

/// Millimeters rounded to integer, as lengths are shown to the user.
pub fn to_display_mm(m: f64) -> i64 {
    m_to_mm(m).round() as i64
}

/// Position in integer millimeters.
pub fn position_mm(p: &Position) -> [i64; 3] {
    [to_display_mm(p.x), to_display_mm(p.y), to_display_mm(p.z)]
}

/// Checks if all elements in the slice are finite
pub fn is_valid(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Print 3R joint values in the display convention (degrees, normalized).
pub fn dump_joints_3r(joints: &Joints3R) {
    let [q1, q2, q3] = joints.to_display_degrees();
    println!("[q1 {:6.2}° q2 {:6.2}° q3 {:6.2}°]", q1, q2, q3);
}

pub fn dump_joints_polar(joints: &JointsPolar) {
    let [theta, phi, rho] = joints.to_degrees();
    println!("[θ {:6.2}° φ {:6.2}° ρ {:4} mm]", theta, phi, to_display_mm(rho));
}

pub fn dump_joints_2r(joints: &Joints2R) {
    let [q1, q2] = joints.to_degrees();
    println!("[q1 {:6.2}° q2 {:6.2}°]", q1, q2);
}

pub fn dump_position(p: &Position) {
    let [x, y, z] = position_mm(p);
    println!("x: {} mm, y: {} mm, z: {} mm", x, y, z);
}

pub fn dump_position_2(p: &Position2) {
    println!("x: {} mm, y: {} mm", to_display_mm(p.x), to_display_mm(p.y));
}

/// formatting for YAML output
pub(crate) fn mm(x: f64) -> String {
    format!("mm({})", m_to_mm(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_angle_lerp_wraps_through_zero() {
        assert!((angle_lerp(350.0, 10.0, 0.5) - 0.0).abs() < EPSILON);
        assert!((angle_lerp(10.0, 350.0, 0.5) - 0.0).abs() < EPSILON);
        assert!((angle_lerp(350.0, 10.0, 0.25) - 355.0).abs() < EPSILON);
    }

    #[test]
    fn test_angle_lerp_endpoints() {
        assert!((angle_lerp(30.0, 120.0, 0.0) - 30.0).abs() < EPSILON);
        assert!((angle_lerp(30.0, 120.0, 1.0) - 120.0).abs() < EPSILON);
        assert!((angle_lerp(-90.0, 90.0, 1.0) - 90.0).abs() < EPSILON);
        // Far apart inputs still take the short way
        assert!((angle_lerp(720.0 + 350.0, -350.0, 0.5) - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_ease_in_out_cubic() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < EPSILON);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < EPSILON);

        let mut previous = ease_in_out_cubic(0.0);
        for i in 1..=1000 {
            let current = ease_in_out_cubic(i as f64 / 1000.0);
            assert!(current >= previous, "not monotonic at step {}", i);
            previous = current;
        }
    }

    #[test]
    fn test_norm_deg_360() {
        assert_eq!(norm_deg_360(0.0), 0.0);
        assert_eq!(norm_deg_360(360.0), 0.0);
        assert_eq!(norm_deg_360(-90.0), 270.0);
        assert_eq!(norm_deg_360(725.0), 5.0);
        let tiny = norm_deg_360(-1e-14);
        assert!(tiny >= 0.0 && tiny < 360.0);
    }

    #[test]
    fn test_wrap_deg() {
        assert_eq!(wrap_deg(190.0, -180.0), -170.0);
        assert_eq!(wrap_deg(-180.0, -180.0), -180.0);
        assert_eq!(wrap_deg(180.0, -180.0), -180.0);
        assert_eq!(wrap_deg(45.0, -180.0), 45.0);
    }

    #[test]
    fn test_clamp_and_lerp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
    }

    #[test]
    fn test_units() {
        assert_eq!(m_to_mm(0.35), 350.0);
        assert_eq!(mm_to_m(400.0), 0.4);
        assert_eq!(to_display_mm(0.3504), 350);
        assert_eq!(to_display_mm(-0.0006), -1);
        assert_eq!(position_mm(&Position::new(0.1, 0.2, -0.3)), [100, 200, -300]);
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid(&[0.0, 1.0, -1.0]));
        assert!(!is_valid(&[0.0, f64::NAN]));
        assert!(!is_valid(&[f64::INFINITY, 1.0]));
    }
}
