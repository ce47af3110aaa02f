//! # Arm simulation library.
//!
//! This library allows other crates in the workspace, and the tests and
//! benches, to access the simulation models defined inside the arm simulation
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm simulation - converts winch string length into arm position and breaks the arm when it's
/// driven too far
pub mod arm_sim;

/// Absolute encoder simulation - the sensor the arm position is published on
pub mod encoder_sim;

/// Grabber simulation - open/closed state of the grabber on the end of the arm
pub mod grabber_sim;

/// Simulation commands - scriptable commands for a simulation run
pub mod sim_cmd;

/// Winch simulation - spools the string in and out
pub mod winch_sim;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Target period of one cycle.
pub const CYCLE_PERIOD_S: f64 = 0.02;
