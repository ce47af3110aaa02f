//! Logging set up for the simulation executables
//!
//! Records go to stdout and to the session's log file. Every line is stamped
//! with the seconds elapsed since the session epoch, and debug/trace lines
//! also carry the module that emitted them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use fern::FormatCallback;
use log::{info, Level, Record};
use std::fmt::Arguments;
use std::path::Path;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target of the winch model's per-cycle traces.
const WINCH_SIM_TARGET: &str = "arm_sim_lib::winch_sim";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Cannot open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been set: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution, recording everything at or
/// above `min_level`.
///
/// Only the first call in a process succeeds.
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    build_dispatch(min_level, &session.log_file_path)?
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn build_dispatch(
    min_level: LevelFilter,
    log_file_path: &Path,
) -> Result<fern::Dispatch, LoggerInitError> {
    let log_file = fern::log_file(log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    Ok(fern::Dispatch::new()
        .format(format_record)
        .level(min_level)
        .level_for(WINCH_SIM_TARGET, winch_sim_level(min_level))
        .chain(std::io::stdout())
        .chain(log_file))
}

/// Per-cycle winch traces are too noisy at 50 Hz, so they stop at debug.
fn winch_sim_level(min_level: LevelFilter) -> LevelFilter {
    min_level.min(LevelFilter::Debug)
}

fn format_record(out: FormatCallback<'_>, message: &Arguments<'_>, record: &Record<'_>) {
    let elapsed_s = session::get_elapsed_seconds();
    let tag = level_tag(record.level());

    if record.level() > Level::Info {
        out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            elapsed_s,
            tag,
            record.target(),
            message
        ))
    } else {
        out.finish(format_args!("[{:10.6} {}] {}", elapsed_s, tag, message))
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info => "INF".normal(),
        Level::Warn => "WRN".yellow(),
        Level::Error => "ERR".red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn temp_log_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("arm_sim_logger_test_{}_{}.log", std::process::id(), name));
        path
    }

    #[test]
    fn test_every_level_builds() {
        let levels = [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ];

        for level in levels.iter() {
            let path = temp_log_path(&format!("{:?}", level));
            assert!(build_dispatch(*level, &path).is_ok(), "level {:?}", level);
            let _ = std::fs::remove_file(&path);
        }
    }

    #[test]
    fn test_level_parsed_from_cli_builds() {
        let level: LevelFilter = "warn".parse().unwrap();
        let path = temp_log_path("cli_warn");
        assert!(build_dispatch(level, &path).is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_winch_sim_capped_at_debug() {
        assert_eq!(winch_sim_level(LevelFilter::Trace), LevelFilter::Debug);
        assert_eq!(winch_sim_level(LevelFilter::Debug), LevelFilter::Debug);
        assert_eq!(winch_sim_level(LevelFilter::Warn), LevelFilter::Warn);
        assert_eq!(winch_sim_level(LevelFilter::Off), LevelFilter::Off);
    }

    #[test]
    fn test_missing_log_dir_is_an_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("arm_sim_logger_missing_{}", std::process::id()));
        path.push("nested");
        path.push("exec.log");

        match build_dispatch(LevelFilter::Info, &path) {
            Err(LoggerInitError::LogFileInitError(_)) => (),
            other => panic!("expected a log file error, got {:?}", other.map(|_| ())),
        }
    }
}
