//! Arm simulation module
//!
//! Simulates a winch-actuated pivoting arm as if it were a real object: the
//! string length reported by the winch is turned into an arm angle, the angle
//! is checked against the arm's mechanical limits and the grabber, and the
//! result is written to a simulated absolute encoder. If the arm is driven
//! too far it breaks, and stays broken.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod geometry;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;
use std::fmt;

// Internal
pub use geometry::{AngleResult, ArmGeometry};
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which prevent an `ArmSim` from being created.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "armLengthFromEdgeToPivot needs to be at least {min_m} meters, otherwise \
        the arm can't be pivoted (found {length_m} m)"
    )]
    ArmLengthBelowMin { length_m: f64, min_m: f64 },

    #[error("encoderRotationsOffset must be in [0, 1), found {0}")]
    InvalidEncoderOffset(f64),

    #[error("{name} must be a positive length, found {value_m} m")]
    NonPositiveLength { name: &'static str, value_m: f64 },

    #[error("{name} must be between -90 and 90 degrees, found {signed_deg}")]
    LimitOutsideRightHalfPlane { name: &'static str, signed_deg: f64 },

    #[error("The top limit ({top_deg} deg) must be above the bottom limit ({bottom_deg} deg)")]
    TopNotAboveBottom { top_deg: f64, bottom_deg: f64 },

    #[error(
        "The grabber break limit ({grabber_deg} deg) must be between the bottom \
        ({bottom_deg} deg) and top ({top_deg} deg) limits"
    )]
    GrabberLimitOutOfRange { grabber_deg: f64, top_deg: f64, bottom_deg: f64 },
}

/// Reason the arm broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakCause {
    /// The winch string length has no matching arm position.
    InvalidGeometry,

    /// The arm was driven through its top hard stop.
    AboveTopLimit,

    /// The arm was driven through its bottom hard stop.
    BelowBottomLimit,

    /// The arm kept moving down with the grabber open while already in the
    /// grabber break range.
    GrabberOpenInBreakRange,
}

/// Events raised while processing a simulation cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    InvalidGeometry { string_len_m: f64 },
    GrabberJammed { limit_signed_deg: f64 },
    GrabberBroke { frozen_signed_deg: f64 },
    AboveTopLimit { limit_signed_deg: f64 },
    BelowBottomLimit { limit_signed_deg: f64 },
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Source of the winch's unspooled string length.
pub trait StringLenSource {
    /// Current unspooled string length, in the same units as the arm
    /// geometry.
    fn string_unspooled_len(&self) -> f64;
}

/// An absolute encoder which accepts a position in rotations.
pub trait AbsEncoderSink {
    /// Set the encoder position, in rotations in the range `[0, 1)`.
    fn set(&mut self, position_rot: f64);
}

/// Query for whether the grabber is open.
pub trait GrabberState {
    fn is_open(&self) -> bool;
}

/// Sink for human readable simulation events.
pub trait Diagnostics {
    fn report(&mut self, event: &SimEvent);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Grabber which is never open, used when no grabber has been attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysClosed;

/// Diagnostics which go to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimEvent {
    /// The break cause for this event, or `None` if the event doesn't break
    /// the arm.
    pub fn break_cause(&self) -> Option<BreakCause> {
        match self {
            SimEvent::InvalidGeometry { .. } => Some(BreakCause::InvalidGeometry),
            SimEvent::GrabberJammed { .. } => None,
            SimEvent::GrabberBroke { .. } => Some(BreakCause::GrabberOpenInBreakRange),
            SimEvent::AboveTopLimit { .. } => Some(BreakCause::AboveTopLimit),
            SimEvent::BelowBottomLimit { .. } => Some(BreakCause::BelowBottomLimit),
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::InvalidGeometry { string_len_m } => write!(
                f,
                "Angle is out of bounds for string length {} m, needs to be in right half plane",
                string_len_m
            ),
            SimEvent::GrabberJammed { limit_signed_deg } => write!(
                f,
                "Grabber is open while trying to move arm to ground, stuck at {} deg",
                limit_signed_deg
            ),
            SimEvent::GrabberBroke { frozen_signed_deg } => write!(
                f,
                "Grabber is open while arm is in breakable range, broken at {} deg",
                frozen_signed_deg
            ),
            SimEvent::AboveTopLimit { limit_signed_deg } => {
                write!(f, "Angle is above top limit of {} deg", limit_signed_deg)
            }
            SimEvent::BelowBottomLimit { limit_signed_deg } => {
                write!(f, "Angle is below bottom limit of {} deg", limit_signed_deg)
            }
        }
    }
}

impl fmt::Display for BreakCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BreakCause::InvalidGeometry => "invalid geometry",
            BreakCause::AboveTopLimit => "driven above top limit",
            BreakCause::BelowBottomLimit => "driven below bottom limit",
            BreakCause::GrabberOpenInBreakRange => "grabber open in break range",
        };
        f.write_str(s)
    }
}

impl GrabberState for AlwaysClosed {
    fn is_open(&self) -> bool {
        false
    }
}

impl<F> GrabberState for F
where
    F: Fn() -> bool
{
    fn is_open(&self) -> bool {
        self()
    }
}

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, event: &SimEvent) {
        warn!("ARM: {}", event);
    }
}
