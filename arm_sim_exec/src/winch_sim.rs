//! # Winch simulation
//!
//! A kinematic model of the arm winch. The spool turns at the demanded speed
//! and the unspooled string length changes by the spool circumference for
//! every turn. Motor dynamics aren't modelled.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// Internal
use crate::arm_sim::StringLenSource;
use util::{
    archive::{ArchiveError, Archiver},
    maths::clamp,
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the winch simulation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Diameter of the spool the string is wound on.
    ///
    /// Units: meters
    pub spool_diameter_m: f64,

    /// String length at the start of the simulation.
    ///
    /// Units: meters
    pub initial_string_len_m: f64,

    /// Length with the string fully spooled in.
    ///
    /// Units: meters
    pub min_string_len_m: f64,

    /// Length with the string fully unspooled.
    ///
    /// Units: meters
    pub max_string_len_m: f64,

    /// Maximum spool speed in either direction.
    ///
    /// Units: rotations/second
    pub max_spool_speed_rps: f64,
}

/// Winch simulation state
#[derive(Default)]
pub struct WinchSim {
    params: Params,

    string_len_m: f64,
    speed_rps: f64,

    report: StatusReport,
    arch_report: Archiver,
}

/// Input data to the winch simulation.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    /// New spool speed demand, or `None` to keep the previous demand.
    ///
    /// Units: rotations/second, positive unspools the string.
    pub speed_dem_rps: Option<f64>,

    /// Time step to integrate over.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Status report for WinchSim processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    pub string_len_m: f64,
    pub speed_rps: f64,
    pub speed_limited: bool,
    pub fully_spooled: bool,
    pub fully_unspooled: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during WinchSim operation.
#[derive(Debug, thiserror::Error)]
pub enum WinchSimError {
    #[error("Spool diameter must be positive, found {0} m")]
    InvalidSpoolDiameter(f64),

    #[error("String length range [{0}, {1}] m is invalid")]
    InvalidLenRange(f64, f64),

    #[error("Initial string length {0} m is outside the string length range")]
    InitialLenOutOfRange(f64),

    #[error("Maximum spool speed must be positive, found {0} rps")]
    InvalidMaxSpeed(f64),

    #[error("Time step must be finite and non-negative, found {0} s")]
    InvalidTimeStep(f64),

    #[error("Could not archive the winch status: {0}")]
    ArchiveError(ArchiveError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for WinchSim {
    type InitData = Params;
    type InitError = WinchSimError;

    type InputData = InputData;
    type OutputData = f64;
    type StatusReport = StatusReport;
    type ProcError = WinchSimError;

    /// Initialise the WinchSim module.
    ///
    /// If a session is given the status report is archived every cycle.
    fn init(
        &mut self,
        init_data: Self::InitData,
        session: Option<&Session>,
    ) -> Result<(), Self::InitError> {
        init_data.validate()?;

        if let Some(s) = session {
            self.arch_report = Archiver::from_path(s, "winch_sim/status_report.csv")
                .map_err(WinchSimError::ArchiveError)?;
        }

        self.string_len_m = init_data.initial_string_len_m;
        self.speed_rps = 0.0;
        self.params = init_data;

        Ok(())
    }

    /// Integrate the string length over one time step.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if !input_data.dt_s.is_finite() || input_data.dt_s < 0.0 {
            return Err(WinchSimError::InvalidTimeStep(input_data.dt_s));
        }

        self.report = StatusReport::default();

        if let Some(dem) = input_data.speed_dem_rps {
            self.set_speed_rps(dem);
        }

        self.step(input_data.dt_s);

        self.arch_report
            .serialise(self.report)
            .map_err(WinchSimError::ArchiveError)?;

        Ok((self.string_len_m, self.report))
    }
}

impl WinchSim {
    /// Create a new winch simulation without archiving.
    pub fn new(params: Params) -> Result<Self, WinchSimError> {
        let mut w = Self::default();
        w.init(params, None)?;
        Ok(w)
    }

    /// Set the spool speed, limited to the maximum speed.
    pub fn set_speed_rps(&mut self, speed_rps: f64) {
        let max = self.params.max_spool_speed_rps;
        self.speed_rps = clamp(speed_rps, -max, max);

        if self.speed_rps != speed_rps {
            self.report.speed_limited = true;
        }
    }

    pub fn speed_rps(&self) -> f64 {
        self.speed_rps
    }

    /// Force the string length, within the allowed range.
    pub fn set_string_len_m(&mut self, string_len_m: f64) {
        self.string_len_m = clamp(
            string_len_m,
            self.params.min_string_len_m,
            self.params.max_string_len_m,
        );
    }

    /// Advance the winch by `dt_s` seconds at the current speed.
    pub fn step(&mut self, dt_s: f64) {
        let circumference_m = PI * self.params.spool_diameter_m;
        let unclamped_m = self.string_len_m + self.speed_rps * circumference_m * dt_s;

        self.set_string_len_m(unclamped_m);

        self.report.string_len_m = self.string_len_m;
        self.report.speed_rps = self.speed_rps;
        self.report.fully_spooled = self.string_len_m <= self.params.min_string_len_m;
        self.report.fully_unspooled = self.string_len_m >= self.params.max_string_len_m;

        trace!(
            "WinchSim: {:.3} rps, string {:.4} m",
            self.speed_rps,
            self.string_len_m
        );
    }
}

impl StringLenSource for WinchSim {
    fn string_unspooled_len(&self) -> f64 {
        self.string_len_m
    }
}

impl Params {
    /// Check the winch parameters are physically possible.
    pub fn validate(&self) -> Result<(), WinchSimError> {
        if !(self.spool_diameter_m > 0.0) {
            return Err(WinchSimError::InvalidSpoolDiameter(self.spool_diameter_m));
        }

        if !(self.min_string_len_m >= 0.0 && self.min_string_len_m < self.max_string_len_m) {
            return Err(WinchSimError::InvalidLenRange(
                self.min_string_len_m,
                self.max_string_len_m,
            ));
        }

        if !(self.min_string_len_m..=self.max_string_len_m).contains(&self.initial_string_len_m) {
            return Err(WinchSimError::InitialLenOutOfRange(self.initial_string_len_m));
        }

        if !(self.max_spool_speed_rps > 0.0) {
            return Err(WinchSimError::InvalidMaxSpeed(self.max_spool_speed_rps));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params() -> Params {
        Params {
            spool_diameter_m: 0.02,
            initial_string_len_m: 1.0,
            min_string_len_m: 0.5,
            max_string_len_m: 1.5,
            max_spool_speed_rps: 2.0,
        }
    }

    #[test]
    fn test_initial_len() {
        let w = WinchSim::new(params()).unwrap();
        assert_eq!(w.string_unspooled_len(), 1.0);
        assert_eq!(w.speed_rps(), 0.0);
    }

    #[test]
    fn test_proc_integrates() {
        let mut w = WinchSim::new(params()).unwrap();

        let (len, report) = w
            .proc(&InputData {
                speed_dem_rps: Some(1.0),
                dt_s: 0.5,
            })
            .unwrap();

        assert_abs_diff_eq!(len, 1.0 + 0.5 * PI * 0.02, epsilon = 1e-12);
        assert!(!report.speed_limited);

        // Speed demand is held when none is given
        let (len2, _) = w.proc(&InputData { speed_dem_rps: None, dt_s: 0.5 }).unwrap();
        assert_abs_diff_eq!(len2, 1.0 + PI * 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_speed_limited() {
        let mut w = WinchSim::new(params()).unwrap();
        let (_, report) = w
            .proc(&InputData {
                speed_dem_rps: Some(-10.0),
                dt_s: 0.0,
            })
            .unwrap();

        assert!(report.speed_limited);
        assert_eq!(w.speed_rps(), -2.0);
    }

    #[test]
    fn test_len_clamped() {
        let mut w = WinchSim::new(params()).unwrap();
        w.set_speed_rps(2.0);

        for _ in 0..1000 {
            w.step(0.1);
        }

        assert_eq!(w.string_unspooled_len(), 1.5);
        assert!(w.proc(&InputData { speed_dem_rps: None, dt_s: 0.02 }).unwrap().1.fully_unspooled);
    }

    #[test]
    fn test_invalid_params() {
        let mut p = params();
        p.spool_diameter_m = 0.0;
        assert!(matches!(WinchSim::new(p), Err(WinchSimError::InvalidSpoolDiameter(_))));

        let mut p = params();
        p.initial_string_len_m = 2.0;
        assert!(matches!(WinchSim::new(p), Err(WinchSimError::InitialLenOutOfRange(_))));

        let mut p = params();
        p.min_string_len_m = 1.5;
        p.max_string_len_m = 0.5;
        assert!(matches!(WinchSim::new(p), Err(WinchSimError::InvalidLenRange(_, _))));

        let mut p = params();
        p.max_spool_speed_rps = 0.0;
        assert!(matches!(WinchSim::new(p), Err(WinchSimError::InvalidMaxSpeed(_))));
    }

    #[test]
    fn test_invalid_time_step() {
        let mut w = WinchSim::new(params()).unwrap();
        assert!(matches!(
            w.proc(&InputData { speed_dem_rps: None, dt_s: -1.0 }),
            Err(WinchSimError::InvalidTimeStep(_))
        ));
    }
}
