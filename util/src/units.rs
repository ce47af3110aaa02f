//! Angle unit conversions
//!
//! Three representations of an angle are used throughout the simulation:
//!
//! - Unsigned degrees in the range `[0, 360)`.
//! - Signed degrees in the range `(-180, 180]`, positive counter-clockwise
//!   from horizontal-right.
//! - Rotations, a fraction of one full revolution in the range `[0, 1)`, which
//!   is what an absolute encoder reports.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::maths::{rem_euclid, wrap_unit};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used by [`less_than_but_not_equal`].
pub const DOUBLE_TOLERANCE: f64 = 1e-6;

/// Number of degrees in one full rotation.
pub const DEGREES_PER_ROTATION: f64 = 360.0;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map unsigned degrees `[0, 360)` to signed degrees `(-180, 180]`.
///
/// Values already in `(-180, 180]` are returned unchanged, anything else is
/// wrapped into range first.
pub fn to_signed_degrees(unsigned_degrees: f64) -> f64 {
    let wrapped = rem_euclid(unsigned_degrees, DEGREES_PER_ROTATION);

    if wrapped > 180.0 {
        wrapped - DEGREES_PER_ROTATION
    }
    else {
        wrapped
    }
}

/// Map signed degrees `(-180, 180]` to unsigned degrees `[0, 360)`.
pub fn to_unsigned_degrees(signed_degrees: f64) -> f64 {
    rem_euclid(signed_degrees, DEGREES_PER_ROTATION)
}

/// True if the signed angle lies in the right half plane, `[-90, 90]`.
pub fn is_in_right_half_plane(signed_degrees: f64) -> bool {
    (-90.0..=90.0).contains(&signed_degrees)
}

/// Strict less than which is false when `a` and `b` are within
/// [`DOUBLE_TOLERANCE`] of each other.
pub fn less_than_but_not_equal(a: f64, b: f64) -> bool {
    a < b && (b - a) > DOUBLE_TOLERANCE
}

/// Shift a rotation position by `offset`, returning a value in `[0, 1)`.
///
/// Works for any sign of `position` or `offset`.
pub fn offset_rotation_position(position: f64, offset: f64) -> f64 {
    wrap_unit(position + offset)
}

/// Convert unsigned degrees to rotations in `[0, 1)`.
pub fn unsigned_degrees_to_rotations(unsigned_degrees: f64) -> f64 {
    wrap_unit(unsigned_degrees / DEGREES_PER_ROTATION)
}

/// Convert an encoder reading which includes `offset` back into signed
/// degrees relative to the true zero.
pub fn to_non_offset_signed_degrees(position: f64, offset: f64) -> f64 {
    let position_without_offset = offset_rotation_position(position, -offset);
    to_signed_degrees(position_without_offset * DEGREES_PER_ROTATION)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_to_signed_degrees() {
        assert_eq!(to_signed_degrees(0.0), 0.0);
        assert_eq!(to_signed_degrees(90.0), 90.0);
        assert_eq!(to_signed_degrees(180.0), 180.0);
        assert_eq!(to_signed_degrees(270.0), -90.0);
        assert_eq!(to_signed_degrees(359.0), -1.0);

        // Already signed values pass straight through
        assert_eq!(to_signed_degrees(-45.0), -45.0);
        assert_eq!(to_signed_degrees(-179.5), -179.5);
        assert_eq!(to_signed_degrees(-180.0), 180.0);
    }

    #[test]
    fn test_to_unsigned_degrees() {
        assert_eq!(to_unsigned_degrees(0.0), 0.0);
        assert_eq!(to_unsigned_degrees(-90.0), 270.0);
        assert_eq!(to_unsigned_degrees(180.0), 180.0);
        assert_eq!(to_unsigned_degrees(45.0), 45.0);
    }

    #[test]
    fn test_signed_round_trip() {
        let mut d = -179.75;
        while d <= 180.0 {
            let rt = to_signed_degrees(to_unsigned_degrees(d));
            assert_abs_diff_eq!(rem_euclid(rt - d, 360.0), 0.0, epsilon = 1e-9);
            d += 0.25;
        }
    }

    #[test]
    fn test_is_in_right_half_plane() {
        assert!(is_in_right_half_plane(-90.0));
        assert!(is_in_right_half_plane(0.0));
        assert!(is_in_right_half_plane(90.0));
        assert!(!is_in_right_half_plane(90.1));
        assert!(!is_in_right_half_plane(-90.1));
        assert!(!is_in_right_half_plane(180.0));
    }

    #[test]
    fn test_less_than_but_not_equal() {
        assert!(less_than_but_not_equal(1.0, 2.0));
        assert!(!less_than_but_not_equal(2.0, 1.0));
        assert!(!less_than_but_not_equal(1.0, 1.0));
        assert!(!less_than_but_not_equal(1.0, 1.0 + DOUBLE_TOLERANCE / 2.0));
        assert!(!less_than_but_not_equal(0.1 + 0.2, 0.3));
    }

    #[test]
    fn test_offset_rotation_position() {
        assert_abs_diff_eq!(offset_rotation_position(0.25, 0.5), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(offset_rotation_position(0.75, 0.5), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(offset_rotation_position(0.25, -0.5), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(offset_rotation_position(-3.1, 0.0), 0.9, epsilon = 1e-12);

        let mut p = -5.0;
        while p < 5.0 {
            for o in &[0.0, 0.1, 0.5, 0.999_999] {
                let r = offset_rotation_position(p, *o);
                assert!(r >= 0.0 && r < 1.0, "{} + {} gave {}", p, o, r);
            }
            p += 0.013;
        }
    }

    #[test]
    fn test_to_non_offset_signed_degrees() {
        // Encoder at 0.35 with an offset of 0.1 is 0.25 rotations, straight up
        assert_abs_diff_eq!(to_non_offset_signed_degrees(0.35, 0.1), 90.0, epsilon = 1e-9);
        // Wraps below zero into the negative half
        assert_abs_diff_eq!(to_non_offset_signed_degrees(0.05, 0.1), -18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unsigned_degrees_to_rotations() {
        assert_eq!(unsigned_degrees_to_rotations(90.0), 0.25);
        assert_eq!(unsigned_degrees_to_rotations(0.0), 0.0);
    }
}
