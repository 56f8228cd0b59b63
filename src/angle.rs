//! Angle estimation from filtered resolver channels
//!
//! The angle code maps one electrical revolution onto `0..=ANGLE_RANGE` with
//! 0° at [`ANGLE_MIDPOINT`]. The code wraps through 0/1000 at ±180°.

/// Width of one revolution in angle-code units
pub const ANGLE_RANGE: i16 = 1000;

/// Angle code of 0°
pub const ANGLE_MIDPOINT: i16 = 500;

/// π as the deployed firmware spells it; boundary truncation depends on it
#[allow(clippy::approx_constant)]
const PI_APPROX: f32 = 3.14159;

/// Convert filtered cosine and sine readings into an angle code
///
/// Computed in single precision in the order
/// `atan2(sine, cosine) * 180 / π * 1000 / 360 + 500`, then truncated toward
/// zero. Because π is approximated slightly low the result spans `0..=1000`:
/// a reading sitting exactly on the negative cosine axis yields 1000.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn angle_code(cosine: i16, sine: i16) -> i16 {
    let radians = libm::atan2f(f32::from(sine), f32::from(cosine));
    // bounded to roughly -0.0005..=1000.0005 by atan2
    (radians * 180.0 / PI_APPROX * 1000.0 / 360.0 + 500.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_degrees_is_midpoint() {
        assert_eq!(angle_code(512, 0), ANGLE_MIDPOINT);
    }

    #[test]
    fn zero_vector_is_midpoint() {
        assert_eq!(angle_code(0, 0), ANGLE_MIDPOINT);
    }

    #[test]
    fn quarter_turns() {
        assert_eq!(angle_code(0, 100), 750);
        assert_eq!(angle_code(300, 300), 625);
        assert_eq!(angle_code(-300, 300), 875);
    }

    #[test]
    fn negative_angles_truncate_below_the_exact_value() {
        // -90° lands at 249.9998 and -135° at 124.9997 before truncation
        assert_eq!(angle_code(0, -100), 249);
        assert_eq!(angle_code(-300, -300), 124);
        assert_eq!(angle_code(300, -300), 374);
    }

    #[test]
    fn wraps_through_the_half_turn() {
        assert_eq!(angle_code(-512, 0), ANGLE_RANGE);
        assert_eq!(angle_code(-512, 1), 999);
        assert_eq!(angle_code(-512, -1), 0);
    }

    #[test]
    fn stays_within_range_over_the_input_domain() {
        for cosine in (-512..=511).step_by(7) {
            for sine in (-512..=511).step_by(7) {
                let code = angle_code(cosine, sine);
                assert!((0..=ANGLE_RANGE).contains(&code), "{cosine}, {sine} -> {code}");
            }
        }
    }
}
