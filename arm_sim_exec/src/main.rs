//! Arm simulation executable entry point.
//! 
//! # Architecture
//! 
//! The general execution methodology consists of:
//! 
//!     - Initialise the winch, grabber, encoder and arm simulations
//!     - Main loop, once per 20 ms cycle:
//!         - Script command processing
//!         - Winch simulation
//!         - Arm simulation, publishing the arm position on the encoder
//!         - Archiving
//! 
//! The loop exits at the end of the script or after the requested number of
//! cycles. A broken arm doesn't stop the loop, the arm just stays where it
//! broke.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use arm_sim_lib::{
    arm_sim::{self, ArmSim, BreakCause, StatusReport},
    encoder_sim::AbsEncoderSim,
    grabber_sim::GrabberSim,
    sim_cmd::SimCmd,
    winch_sim::{self, WinchSim},
    CYCLE_PERIOD_S,
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "arm_sim_exec", about = "Simulates the winch driven arm")]
struct Opt {
    /// Path to the simulation script to run.
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Stop after this many cycles, even if the script hasn't finished.
    #[structopt(long)]
    cycles: Option<u64>,

    /// Run cycles back to back rather than in real time.
    #[structopt(long)]
    fast: bool,

    /// Minimum level to log at.
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,
}

/// A row of the arm archive.
#[derive(Serialize)]
struct ArmArchRecord {
    time_s: f64,
    string_len_m: Option<f64>,
    signed_deg: Option<f64>,
    encoder_position_rot: f64,
    encoder_position_deg: f64,
    grabber_open: bool,
    grabber_jammed: bool,
    is_broken: bool,
    break_cause: Option<BreakCause>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "arm_sim_exec", 
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opt.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Simulation Executable\n");
    let host_info = host::get_uname().wrap_err("Failed to get host information")?;
    info!(
        "Running on: {} ({} {})",
        host_info.nodename,
        host_info.sysname,
        host_info.machine
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let arm_params: arm_sim::Params = util::params::load("arm_sim.toml")
        .wrap_err("Could not load arm_sim params")?;
    let winch_params: winch_sim::Params = util::params::load("winch_sim.toml")
        .wrap_err("Could not load winch_sim params")?;

    info!("Parameters loaded");

    // ---- LOAD SCRIPT ----

    info!("Loading script from {:?}", opt.script);

    let mut script: ScriptInterpreter<SimCmd> = ScriptInterpreter::new(&opt.script)
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} commands\n",
        script.get_duration(),
        script.get_num_cmds()
    );

    // ---- INITIALISE MODELS ----

    info!("Initialising simulation...");

    let mut winch = WinchSim::default();
    winch.init(winch_params, Some(&session))
        .wrap_err("Failed to initialise WinchSim")?;
    info!("WinchSim init complete");

    let grabber = GrabberSim::new();

    let mut arm = ArmSim::new(&arm_params, winch, AbsEncoderSim::new())
        .wrap_err("Failed to initialise ArmSim")?
        .with_grabber(grabber.clone());
    info!("ArmSim init complete");

    let mut arch_arm = Archiver::from_path(&session, "arm_sim/status_report.csv")
        .wrap_err("Failed to create the ArmSim archive")?;

    info!("Simulation initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut num_cycles: u64 = 0;
    let mut sim_time_s = 0.0;

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- COMMAND PROCESSING ----

        let mut speed_dem_rps = None;

        match script.get_pending_cmds(sim_time_s) {
            PendingCmds::Some(cmds) => for cmd in cmds {
                debug!("Executing {:?}", cmd);

                match cmd {
                    SimCmd::WinchSpeed { rps } => speed_dem_rps = Some(rps),
                    SimCmd::Stop => speed_dem_rps = Some(0.0),
                    SimCmd::OpenGrabber => grabber.open(),
                    SimCmd::CloseGrabber => grabber.close(),
                }
            },
            PendingCmds::None => (),
            PendingCmds::EndOfScript => {
                info!("End of script reached");
                break
            }
        }

        // ---- SIMULATION ----

        arm.winch_mut()
            .proc(&winch_sim::InputData {
                speed_dem_rps,
                dt_s: CYCLE_PERIOD_S,
            })
            .wrap_err("Error during WinchSim processing")?;

        let report = arm.simulation_periodic();

        if report.newly_broken {
            warn!(
                "Arm broken at {:.2} s ({})",
                sim_time_s,
                report.break_cause
                    .map(|c| c.to_string())
                    .unwrap_or_default()
            );
        }

        // ---- ARCHIVING ----

        arch_arm
            .serialise(arch_record(sim_time_s, &report, arm.encoder()))
            .wrap_err("Failed to archive ArmSim status")?;

        // ---- CYCLE MANAGEMENT ----

        num_cycles += 1;
        sim_time_s = num_cycles as f64 * CYCLE_PERIOD_S;

        if let Some(max) = opt.cycles {
            if num_cycles >= max {
                info!("Cycle limit of {} reached", max);
                break
            }
        }

        if !opt.fast {
            // Get the end time of the cycle
            let cycle_dur = Instant::now() - cycle_start_instant;
            let target = Duration::from_secs_f64(CYCLE_PERIOD_S);

            // Sleep for the rest of the cycle, or warn on an overrun
            match target.checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                ),
            }
        }
    }

    // ---- SUMMARY ----

    info!("Simulation ran for {} cycles ({:.2} s)", num_cycles, sim_time_s);
    match arm.current_signed_degrees() {
        Some(d) => info!("    Final arm angle: {:.3} deg", d),
        None => info!("    Final arm angle: unknown"),
    }
    info!("    Final encoder position: {:.6} rot", arm.encoder().get());
    match arm.break_cause() {
        Some(c) => warn!("    Arm is BROKEN: {}", c),
        None => info!("    Arm is intact"),
    }

    Ok(())
}

/// Build an archive record from the arm's status report.
fn arch_record(time_s: f64, report: &StatusReport, encoder: &AbsEncoderSim) -> ArmArchRecord {
    ArmArchRecord {
        time_s,
        string_len_m: report.string_len_m,
        signed_deg: report.signed_deg,
        encoder_position_rot: encoder.get(),
        encoder_position_deg: encoder.get_degrees(),
        grabber_open: report.grabber_open,
        grabber_jammed: report.grabber_jammed,
        is_broken: report.is_broken,
        break_cause: report.break_cause,
    }
}
