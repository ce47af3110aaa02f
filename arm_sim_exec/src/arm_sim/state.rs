//! Implementations for the ArmSim state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{
    AbsEncoderSink, AlwaysClosed, ArmGeometry, BreakCause, ConfigError, Diagnostics,
    GrabberState, Limits, LogDiagnostics, Params, SimEvent, StringLenSource,
};
use util::units::{
    less_than_but_not_equal, offset_rotation_position, to_unsigned_degrees,
    unsigned_degrees_to_rotations,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm simulation state.
///
/// Reads the string length from the winch `W` each cycle and writes the
/// resulting arm position to the absolute encoder `E`.
pub struct ArmSim<W, E> {
    params: Params,
    geometry: ArmGeometry,
    limits: Limits,

    winch: W,
    encoder: E,
    grabber: Box<dyn GrabberState>,
    diagnostics: Box<dyn Diagnostics>,

    state: SimState,
    report: StatusReport,
}

/// Status report for ArmSim processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// String length read from the winch this cycle, `None` if the arm was
    /// already broken and the winch wasn't read.
    pub string_len_m: Option<f64>,

    /// Arm angle at the end of the cycle.
    pub signed_deg: Option<f64>,

    /// Position written to the encoder this cycle.
    pub encoder_position_rot: Option<f64>,

    pub grabber_open: bool,
    pub grabber_jammed: bool,
    pub top_limited: bool,
    pub bottom_limited: bool,

    pub is_broken: bool,

    /// True only on the cycle in which the arm broke.
    pub newly_broken: bool,

    pub break_cause: Option<BreakCause>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of the simulated arm.
///
/// `Broken` is absorbing, once entered the arm never moves again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimState {
    Operational {
        /// Angle from the last cycle, `None` before the first cycle.
        current_signed_deg: Option<f64>,
    },
    Broken {
        /// Angle the arm was frozen at, `None` if it broke on the first cycle.
        frozen_signed_deg: Option<f64>,
        cause: BreakCause,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimState {
    fn default() -> Self {
        SimState::Operational {
            current_signed_deg: None,
        }
    }
}

impl<W, E> ArmSim<W, E>
where
    W: StringLenSource,
    E: AbsEncoderSink,
{
    /// Create a new arm simulation.
    ///
    /// All parameters are validated here, an invalid configuration never
    /// produces a simulation. The encoder isn't written until the first call
    /// to `simulation_periodic`.
    pub fn new(params: &Params, winch: W, encoder: E) -> Result<Self, ConfigError> {
        params.validate()?;

        let geometry = ArmGeometry::new(
            params.height_from_winch_to_pivot_m,
            params.arm_length_from_edge_to_pivot_m,
        )?;

        let limits = Limits::from_params(params)?;

        debug!(
            "ArmSim limits: top {:.3} deg, bottom {:.3} deg, grabber break {:.3} deg",
            limits.top_deg, limits.bottom_deg, limits.grabber_break_deg
        );

        Ok(Self {
            params: params.clone(),
            geometry,
            limits,
            winch,
            encoder,
            grabber: Box::new(AlwaysClosed),
            diagnostics: Box::new(LogDiagnostics),
            state: SimState::default(),
            report: StatusReport::default(),
        })
    }

    /// Use the given grabber query instead of an always closed grabber.
    pub fn with_grabber<G: GrabberState + 'static>(mut self, grabber: G) -> Self {
        self.set_grabber(grabber);
        self
    }

    /// Send events to the given diagnostics sink instead of the log.
    pub fn with_diagnostics<D: Diagnostics + 'static>(mut self, diagnostics: D) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn set_grabber<G: GrabberState + 'static>(&mut self, grabber: G) {
        self.grabber = Box::new(grabber);
    }

    /// Perform one simulation cycle.
    pub fn simulation_periodic(&mut self) -> StatusReport {
        self.report = StatusReport::default();

        // If the arm is broken, there's nothing to update
        let current_signed_deg = match self.state {
            SimState::Broken {
                frozen_signed_deg,
                cause,
            } => {
                self.report.signed_deg = frozen_signed_deg;
                self.report.is_broken = true;
                self.report.break_cause = Some(cause);
                return self.report;
            }
            SimState::Operational { current_signed_deg } => current_signed_deg,
        };

        let grabber_open = self.grabber.is_open();
        self.report.grabber_open = grabber_open;

        let string_len_m = self.winch.string_unspooled_len();
        self.report.string_len_m = Some(string_len_m);

        let mut new_signed_deg = match self
            .geometry
            .calc_signed_degrees_for_string_len(string_len_m)
            .valid()
        {
            Some(d) => d,
            None => {
                // Position is left where it was
                self.emit(SimEvent::InvalidGeometry { string_len_m });
                self.break_at(current_signed_deg, BreakCause::InvalidGeometry);
                return self.report;
            }
        };

        trace!("ArmSim: {:.4} m -> {:.4} deg", string_len_m, new_signed_deg);

        let mut cause = None;

        // Grabber interaction
        if let Some(prev_signed_deg) = current_signed_deg {
            if grabber_open && self.is_in_grabber_break_range(new_signed_deg) {
                if self.is_above_grabber_break_range(prev_signed_deg) {
                    // About to enter the break range, the arm jams on the
                    // grabber but doesn't break
                    new_signed_deg = self.limits.grabber_break_deg;
                    self.report.grabber_jammed = true;
                    self.emit(SimEvent::GrabberJammed {
                        limit_signed_deg: new_signed_deg,
                    });
                }
                else {
                    // Already at or in the break range, the arm breaks and
                    // doesn't move from where it was
                    new_signed_deg = prev_signed_deg;
                    cause = Some(BreakCause::GrabberOpenInBreakRange);
                    self.emit(SimEvent::GrabberBroke {
                        frozen_signed_deg: new_signed_deg,
                    });
                }
            }
        }

        // Hard stops
        if new_signed_deg > self.limits.top_deg {
            new_signed_deg = self.limits.top_deg;
            self.report.top_limited = true;
            cause = cause.or(Some(BreakCause::AboveTopLimit));
            self.emit(SimEvent::AboveTopLimit {
                limit_signed_deg: new_signed_deg,
            });
        }

        if new_signed_deg < self.limits.bottom_deg {
            new_signed_deg = self.limits.bottom_deg;
            self.report.bottom_limited = true;
            cause = cause.or(Some(BreakCause::BelowBottomLimit));
            self.emit(SimEvent::BelowBottomLimit {
                limit_signed_deg: new_signed_deg,
            });
        }

        // Update the current position and the encoder
        let position_rot = self.signed_deg_to_encoder_position(new_signed_deg);
        self.encoder.set(position_rot);

        self.report.signed_deg = Some(new_signed_deg);
        self.report.encoder_position_rot = Some(position_rot);

        match cause {
            Some(c) => self.break_at(Some(new_signed_deg), c),
            None => {
                self.state = SimState::Operational {
                    current_signed_deg: Some(new_signed_deg),
                }
            }
        }

        self.report
    }

    /// Convert a signed angle into the encoder reading, including the
    /// encoder offset.
    pub fn signed_deg_to_encoder_position(&self, signed_deg: f64) -> f64 {
        let position_rot = unsigned_degrees_to_rotations(to_unsigned_degrees(signed_deg));

        offset_rotation_position(position_rot, self.params.encoder_rotations_offset)
    }

    pub fn is_broken(&self) -> bool {
        matches!(self.state, SimState::Broken { .. })
    }

    pub fn break_cause(&self) -> Option<BreakCause> {
        match self.state {
            SimState::Broken { cause, .. } => Some(cause),
            SimState::Operational { .. } => None,
        }
    }

    /// The arm's current angle, `None` before the first cycle.
    pub fn current_signed_degrees(&self) -> Option<f64> {
        match self.state {
            SimState::Operational { current_signed_deg } => current_signed_deg,
            SimState::Broken {
                frozen_signed_deg, ..
            } => frozen_signed_deg,
        }
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Report from the last cycle.
    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn geometry(&self) -> &ArmGeometry {
        &self.geometry
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn winch(&self) -> &W {
        &self.winch
    }

    pub fn winch_mut(&mut self) -> &mut W {
        &mut self.winch
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Arm is below the grabber break limit.
    fn is_in_grabber_break_range(&self, signed_deg: f64) -> bool {
        less_than_but_not_equal(signed_deg, self.limits.grabber_break_deg)
    }

    /// Arm is clear of the grabber break limit. An arm sitting on the limit
    /// is jammed, so it is not above the range.
    fn is_above_grabber_break_range(&self, signed_deg: f64) -> bool {
        less_than_but_not_equal(self.limits.grabber_break_deg, signed_deg)
    }

    fn break_at(&mut self, frozen_signed_deg: Option<f64>, cause: BreakCause) {
        debug!("ArmSim broken: {}", cause);

        self.state = SimState::Broken {
            frozen_signed_deg,
            cause,
        };

        self.report.signed_deg = frozen_signed_deg;
        self.report.is_broken = true;
        self.report.newly_broken = true;
        self.report.break_cause = Some(cause);
    }

    fn emit(&mut self, event: SimEvent) {
        self.diagnostics.report(&event);
    }
}
