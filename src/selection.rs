use std::f64::consts::PI;

/// Offset between slice zero's drawing start (angle 0, pointing right) and the
/// pointer at the top of the wheel, in degrees.
pub const POINTER_OFFSET_DEGREES: f64 = 90.0;

// Absorbs radian/degree round-off so a pointer sitting exactly on a slice
// boundary lands on the slice that starts there.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Index of the slice under the pointer once the wheel stops at
/// `rotation_angle` radians.
///
/// Slices are laid out clockwise from `rotation_angle` with the pointer fixed
/// at the top. Returns `None` only when there are no slices; for any `n >= 1`
/// the result lies in `0..n`. Negative angles are normalized with a Euclidean
/// modulo and a non-finite angle resolves as if the wheel never turned.
pub fn resolve(rotation_angle: f64, slice_width: f64, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let angle = if rotation_angle.is_finite() {
        rotation_angle
    } else {
        0.0
    };
    let degrees = angle * 180.0 / PI + POINTER_OFFSET_DEGREES;
    let normalized = (360.0 - degrees.rem_euclid(360.0)).rem_euclid(360.0);
    let slice_degrees = slice_width * 180.0 / PI;
    if slice_degrees.is_nan() || slice_degrees <= 0.0 {
        return Some(0);
    }
    let index = (normalized / slice_degrees + BOUNDARY_EPSILON).floor();
    Some((index.max(0.0) as usize).min(n - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

    fn width(n: usize) -> f64 {
        TAU / n as f64
    }

    #[test]
    fn test_four_names_at_rest_picks_last() {
        // pointer-degrees 90, normalized 270, 270 / 90 = 3
        assert_eq!(resolve(0.0, FRAC_PI_2, 4), Some(3));
    }

    #[test]
    fn test_turning_clockwise_walks_slices_backwards() {
        // Mid-slice positions: 45° -> normalized 225, 135° -> 135, 225° -> 45
        assert_eq!(resolve(FRAC_PI_4, FRAC_PI_2, 4), Some(2));
        assert_eq!(resolve(3.0 * FRAC_PI_4, FRAC_PI_2, 4), Some(1));
        assert_eq!(resolve(5.0 * FRAC_PI_4, FRAC_PI_2, 4), Some(0));
        assert_eq!(resolve(7.0 * FRAC_PI_4, FRAC_PI_2, 4), Some(3));
    }

    #[test]
    fn test_single_slice_always_wins() {
        for angle in [0.0, 1.0, -7.5, 1234.5] {
            assert_eq!(resolve(angle, TAU, 1), Some(0));
        }
    }

    #[test]
    fn test_no_slices() {
        assert_eq!(resolve(0.0, 0.0, 0), None);
    }

    #[test]
    fn test_negative_angle_is_normalized() {
        assert_eq!(resolve(-FRAC_PI_4, FRAC_PI_2, 4), Some(3));
        assert_eq!(resolve(-3.0 * FRAC_PI_4, FRAC_PI_2, 4), Some(0));
        assert_eq!(resolve(-TAU, FRAC_PI_2, 4), resolve(0.0, FRAC_PI_2, 4));
    }

    #[test]
    fn test_non_finite_angle() {
        assert_eq!(resolve(f64::NAN, FRAC_PI_2, 4), Some(3));
        assert_eq!(resolve(f64::INFINITY, FRAC_PI_2, 4), Some(3));
    }

    proptest! {
        #[test]
        fn prop_index_in_range(n in 1usize..200, angle in -1.0e6f64..1.0e6) {
            let idx = resolve(angle, width(n), n);
            prop_assert!(matches!(idx, Some(i) if i < n));
        }

        #[test]
        fn prop_periodic_in_full_turns(n in 1usize..64, angle in -1.0e3f64..1.0e3) {
            let w = width(n);
            // Stay away from slice boundaries where float error flips the floor.
            let pos = ((360.0 - (angle.to_degrees() + 90.0).rem_euclid(360.0)).rem_euclid(360.0))
                / (360.0 / n as f64);
            prop_assume!((pos - pos.round()).abs() > 1e-4);
            prop_assert_eq!(resolve(angle, w, n), resolve(angle + TAU, w, n));
        }
    }
}
