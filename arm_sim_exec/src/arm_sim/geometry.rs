//! Arm angle geometry
//!
//! The winch anchor sits directly below the arm pivot. The winch string runs
//! from the anchor to the arm's edge, so the anchor, the pivot and the edge
//! form a triangle with two fixed sides:
//!
//! ```text
//!  pivot o-----------o edge
//!        |   arm    /
//! height |        /  string
//!        |      /
//! anchor o----'
//! ```
//!
//! The law of cosines gives the angle at the pivot between "straight down"
//! and the arm. Subtracting 90 degrees converts it to signed degrees where 0 is
//! horizontal and positive is towards vertical-up.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::units::less_than_but_not_equal;

use super::ConfigError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Fixed geometry of the arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmGeometry {
    /// Height from the winch anchor up to the pivot point.
    ///
    /// Units: meters
    height_to_pivot_m: f64,

    /// Length of the arm from its string attachment edge to the pivot point.
    ///
    /// Units: meters
    arm_length_to_pivot_m: f64,
}

/// Result of an angle calculation.
///
/// If `is_valid` is false the string length has no matching arm position and
/// `signed_deg` must not be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleResult {
    pub signed_deg: f64,
    pub is_valid: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AngleResult {
    /// The angle if it is valid.
    pub fn valid(self) -> Option<f64> {
        if self.is_valid {
            Some(self.signed_deg)
        }
        else {
            None
        }
    }
}

impl ArmGeometry {
    /// Create a new geometry, both lengths must be finite and positive.
    pub fn new(height_to_pivot_m: f64, arm_length_to_pivot_m: f64) -> Result<Self, ConfigError> {
        check_length("heightFromWinchToPivotPoint", height_to_pivot_m)?;
        check_length("armLengthFromEdgeToPivot", arm_length_to_pivot_m)?;

        Ok(Self {
            height_to_pivot_m,
            arm_length_to_pivot_m,
        })
    }

    pub fn height_to_pivot_m(&self) -> f64 {
        self.height_to_pivot_m
    }

    pub fn arm_length_to_pivot_m(&self) -> f64 {
        self.arm_length_to_pivot_m
    }

    /// Shortest and longest string lengths, reached with the arm pointing
    /// straight down and straight up. Neither is itself a valid position.
    pub fn string_len_range_m(&self) -> (f64, f64) {
        let h = self.height_to_pivot_m;
        let l = self.arm_length_to_pivot_m;

        ((h - l).abs(), h + l)
    }

    /// Calculate the signed arm angle in degrees for the given string length.
    pub fn calc_signed_degrees_for_string_len(&self, string_len_m: f64) -> AngleResult {
        let h = self.height_to_pivot_m;
        let l = self.arm_length_to_pivot_m;
        let (min_len_m, max_len_m) = self.string_len_range_m();

        // Triangle inequality, degenerate (flat) triangles are out of range
        let mut is_valid = string_len_m.is_finite()
            && less_than_but_not_equal(min_len_m, string_len_m)
            && less_than_but_not_equal(string_len_m, max_len_m);

        let cos_pivot = (h * h + l * l - string_len_m * string_len_m) / (2.0 * h * l);

        if !(-1.0..=1.0).contains(&cos_pivot) {
            is_valid = false;
        }

        // Angle between straight down and the arm, in [0, 180]
        let pivot_deg = cos_pivot.max(-1.0).min(1.0).acos().to_degrees();

        AngleResult {
            signed_deg: pivot_deg - 90.0,
            is_valid,
        }
    }

    /// String length which puts the arm at the given signed angle, or `None`
    /// if the angle is outside the right half plane.
    pub fn string_len_for_signed_degrees(&self, signed_deg: f64) -> Option<f64> {
        if !util::units::is_in_right_half_plane(signed_deg) {
            return None
        }

        let h = self.height_to_pivot_m;
        let l = self.arm_length_to_pivot_m;

        // cos(signed + 90) = -sin(signed)
        let len_sq = h * h + l * l + 2.0 * h * l * signed_deg.to_radians().sin();

        Some(len_sq.max(0.0).sqrt())
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_length(name: &'static str, value_m: f64) -> Result<(), ConfigError> {
    if value_m.is_finite() && value_m > 0.0 {
        Ok(())
    }
    else {
        Err(ConfigError::NonPositiveLength { name, value_m })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn geom() -> ArmGeometry {
        ArmGeometry::new(1.0, 0.5).unwrap()
    }

    #[test]
    fn test_horizontal() {
        // Right angle at the pivot, string is the hypotenuse
        let r = geom().calc_signed_degrees_for_string_len(1.25f64.sqrt());
        assert!(r.is_valid);
        assert_abs_diff_eq!(r.signed_deg, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_up_and_down() {
        let g = geom();

        // Round trip through the inverse
        for deg in &[-80.0, -45.0, -10.0, 10.0, 30.0, 60.0, 89.0] {
            let len = g.string_len_for_signed_degrees(*deg).unwrap();
            let r = g.calc_signed_degrees_for_string_len(len);
            assert!(r.is_valid, "{} deg should be valid", deg);
            assert_abs_diff_eq!(r.signed_deg, *deg, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_degenerate_lengths_invalid() {
        let g = geom();
        let (min_len, max_len) = g.string_len_range_m();
        assert_eq!(min_len, 0.5);
        assert_eq!(max_len, 1.5);

        assert!(!g.calc_signed_degrees_for_string_len(min_len).is_valid);
        assert!(!g.calc_signed_degrees_for_string_len(max_len).is_valid);
    }

    #[test]
    fn test_between_lengths_valid() {
        let g = geom();
        let (min_len, max_len) = g.string_len_range_m();

        let steps = 200;
        for i in 1..steps {
            let len = min_len + (max_len - min_len) * (i as f64) / (steps as f64);
            let r = g.calc_signed_degrees_for_string_len(len);
            assert!(r.is_valid);
            assert!(r.signed_deg > -90.0 && r.signed_deg < 90.0);
        }
    }

    #[test]
    fn test_impossible_lengths_invalid() {
        let g = geom();

        assert_eq!(g.calc_signed_degrees_for_string_len(0.2).valid(), None);
        assert_eq!(g.calc_signed_degrees_for_string_len(2.0).valid(), None);
        assert_eq!(g.calc_signed_degrees_for_string_len(-1.0).valid(), None);
        assert_eq!(g.calc_signed_degrees_for_string_len(std::f64::NAN).valid(), None);
    }

    #[test]
    fn test_inverse_out_of_plane() {
        assert_eq!(geom().string_len_for_signed_degrees(120.0), None);
    }

    #[test]
    fn test_new_rejects_bad_lengths() {
        assert!(matches!(
            ArmGeometry::new(0.0, 0.5),
            Err(ConfigError::NonPositiveLength { name: "heightFromWinchToPivotPoint", .. })
        ));
        assert!(matches!(
            ArmGeometry::new(1.0, -0.5),
            Err(ConfigError::NonPositiveLength { name: "armLengthFromEdgeToPivot", .. })
        ));
    }
}
