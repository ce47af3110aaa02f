//! Parameters structure for ArmSim

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::units::{is_in_right_half_plane, to_non_offset_signed_degrees};

use super::ConfigError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the arm simulation.
///
/// Rotation values are as read by the arm's absolute encoder, so they include
/// `encoder_rotations_offset`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- LIMITS ----

    /// Highest position the arm is commanded to.
    ///
    /// Units: rotations
    pub top_rotations_limit: f64,

    /// Lowest position the arm is commanded to.
    ///
    /// Units: rotations
    pub bottom_rotations_limit: f64,

    /// How far past the top or bottom limit the arm can travel before it hits
    /// a hard stop and breaks.
    ///
    /// Units: rotations
    pub delta_rotations_before_broken: f64,

    /// Below this position the arm breaks if the grabber is open.
    ///
    /// Units: rotations
    pub grabber_breaks_if_open_below_rotations: f64,

    // ---- GEOMETRY ----

    /// Height from the winch anchor up to the pivot point.
    ///
    /// Units: meters
    pub height_from_winch_to_pivot_m: f64,

    /// Length of the arm from the string attachment edge to the pivot.
    ///
    /// Units: meters
    pub arm_length_from_edge_to_pivot_m: f64,

    /// Minimum `arm_length_from_edge_to_pivot_m` for the winch to be able to
    /// pivot the arm at all.
    ///
    /// Units: meters
    pub arm_length_from_edge_to_pivot_min_m: f64,

    // ---- ENCODER ----

    /// Encoder reading when the arm is horizontal.
    ///
    /// Units: rotations, in `[0, 1)`
    pub encoder_rotations_offset: f64,
}

/// Arm limits in signed degrees relative to horizontal.
///
/// Invariant: `bottom_deg < grabber_break_deg < top_deg`, all in the right
/// half plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Limits {
    pub top_deg: f64,
    pub bottom_deg: f64,
    pub grabber_break_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parts of the parameters which don't depend on the limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arm_length_from_edge_to_pivot_m < self.arm_length_from_edge_to_pivot_min_m {
            return Err(ConfigError::ArmLengthBelowMin {
                length_m: self.arm_length_from_edge_to_pivot_m,
                min_m: self.arm_length_from_edge_to_pivot_min_m,
            })
        }

        if !(0.0..1.0).contains(&self.encoder_rotations_offset) {
            return Err(ConfigError::InvalidEncoderOffset(self.encoder_rotations_offset))
        }

        Ok(())
    }
}

impl Limits {
    /// Derive the limits from the parameters, removing the encoder offset.
    ///
    /// The top and bottom limits are widened by the break delta, since the
    /// arm only breaks once it goes past them by that much.
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        let offset = params.encoder_rotations_offset;

        let limits = Self {
            top_deg: to_non_offset_signed_degrees(
                params.top_rotations_limit + params.delta_rotations_before_broken,
                offset,
            ),
            bottom_deg: to_non_offset_signed_degrees(
                params.bottom_rotations_limit - params.delta_rotations_before_broken,
                offset,
            ),
            grabber_break_deg: to_non_offset_signed_degrees(
                params.grabber_breaks_if_open_below_rotations,
                offset,
            ),
        };

        limits.validate()?;

        Ok(limits)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("topSignedDegreesLimit", self.top_deg),
            ("bottomSignedDegreesLimit", self.bottom_deg),
            ("grabberBreaksIfOpenBelowSignedDegreesLimit", self.grabber_break_deg),
        ];

        for (name, signed_deg) in checks.iter() {
            if !is_in_right_half_plane(*signed_deg) {
                return Err(ConfigError::LimitOutsideRightHalfPlane {
                    name: *name,
                    signed_deg: *signed_deg,
                })
            }
        }

        if self.top_deg <= self.bottom_deg {
            return Err(ConfigError::TopNotAboveBottom {
                top_deg: self.top_deg,
                bottom_deg: self.bottom_deg,
            })
        }

        if self.grabber_break_deg >= self.top_deg || self.grabber_break_deg <= self.bottom_deg {
            return Err(ConfigError::GrabberLimitOutOfRange {
                grabber_deg: self.grabber_break_deg,
                top_deg: self.top_deg,
                bottom_deg: self.bottom_deg,
            })
        }

        Ok(())
    }
}
