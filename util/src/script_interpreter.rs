//! # Simulation script interpreter module
//!
//! This module provides an interpreter for simulation scripts, allowing 
//! timed commands to be replayed into the simulation.
//!
//! A script is a series of entries of the form `<time_s>: <json>;`, for
//! example:
//!
//! ```text
//! 0.0: {"type": "WinchSpeed", "rps": 0.5};
//! 2.5: {"type": "OpenGrabber"};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct Command<C> {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The command to run
    cmd: C
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_cmds` to acquire a list of commands that need executing.
pub struct ScriptInterpreter<C> {
    script_path: Option<PathBuf>,
    cmds: VecDeque<Command<C>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCmd(f64, serde_json::Error),

    #[error("Script timestamps must not decrease, found {1} s after {0} s")]
    OutOfOrder(f64, f64)
}

/// Commands which are due to be executed.
#[derive(Debug, PartialEq)]
pub enum PendingCmds<C> {
    None,
    Some(Vec<C>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C> ScriptInterpreter<C>
where
    C: DeserializeOwned
{

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());
        
        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_str(&script)?;
        si.script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {

        // Empty queue of commands
        let mut cmd_queue: VecDeque<Command<C>> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = match RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
        {
            Ok(r) => r,
            Err(e) => crate::raise_error!("Script regex is invalid: {}", e)
        };

        for cap in re.captures_iter(script) {
            // Parse the exec time, group 1 always participates in a match
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = cmd_queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(prev.exec_time_s, exec_time_s))
                }
            }

            // Parse the command from the payload. The scripts contain JSON
            // only.
            let cmd = serde_json::from_str(&cap[3])
                .map_err(|e| ScriptError::InvalidCmd(exec_time_s, e))?;

            // Build command from the match
            cmd_queue.push_back(Command {
                exec_time_s,
                cmd
            });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            script_path: None,
            cmds: cmd_queue
        })
    }

    /// Return the commands due at `current_time_s`.
    ///
    /// A command is due once the current time reaches its timestamp.
    pub fn get_pending_cmds(&mut self, current_time_s: f64) -> PendingCmds<C> {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingCmds::EndOfScript
        }

        let mut cmd_vec: Vec<C> = vec![];

        // Pop items from the queue while the head's exec time is not later
        // than the current time.
        while self.cmds.front()
            .map(|c| c.exec_time_s <= current_time_s)
            .unwrap_or(false)
        {
            if let Some(c) = self.cmds.pop_front() {
                cmd_vec.push(c.cmd);
            }
        }

        // If the vector is longer than 0 return Some, otherwise None
        if !cmd_vec.is_empty() {
            PendingCmds::Some(cmd_vec)
        }
        else {
            PendingCmds::None
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }

    /// Path the script was loaded from, if it came from a file.
    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(tag = "type")]
    enum TestCmd {
        Go { speed: f64 },
        Halt,
    }

    const SCRIPT: &str = "
        0.0: {\"type\": \"Go\", \"speed\": 1.5};
        1.0: {\"type\": \"Halt\"};
        1.0: {\"type\": \"Go\", \"speed\": -0.5};
    ";

    #[test]
    fn test_parse_script() {
        let si: ScriptInterpreter<TestCmd> = ScriptInterpreter::from_str(SCRIPT).unwrap();
        assert_eq!(si.get_num_cmds(), 3);
        assert_eq!(si.get_duration(), 1.0);
        assert!(si.script_path().is_none());
    }

    #[test]
    fn test_pending_cmds() {
        let mut si: ScriptInterpreter<TestCmd> = ScriptInterpreter::from_str(SCRIPT).unwrap();

        assert_eq!(
            si.get_pending_cmds(0.0),
            PendingCmds::Some(vec![TestCmd::Go { speed: 1.5 }])
        );
        assert_eq!(si.get_pending_cmds(0.5), PendingCmds::None);
        assert_eq!(
            si.get_pending_cmds(1.02),
            PendingCmds::Some(vec![TestCmd::Halt, TestCmd::Go { speed: -0.5 }])
        );
        assert_eq!(si.get_pending_cmds(2.0), PendingCmds::EndOfScript);
    }

    #[test]
    fn test_empty_script() {
        let r: Result<ScriptInterpreter<TestCmd>, _> = ScriptInterpreter::from_str("# nothing");
        assert!(matches!(r, Err(ScriptError::ScriptEmpty)));
    }

    #[test]
    fn test_invalid_cmd() {
        let r: Result<ScriptInterpreter<TestCmd>, _> =
            ScriptInterpreter::from_str("2.0: {\"type\": \"Fly\"};");
        assert!(matches!(r, Err(ScriptError::InvalidCmd(t, _)) if t == 2.0));
    }

    #[test]
    fn test_out_of_order() {
        let r: Result<ScriptInterpreter<TestCmd>, _> = ScriptInterpreter::from_str(
            "2.0: {\"type\": \"Halt\"};\n1.0: {\"type\": \"Halt\"};"
        );
        assert!(matches!(r, Err(ScriptError::OutOfOrder(_, _))));
    }

    #[test]
    fn test_missing_file() {
        let r: Result<ScriptInterpreter<TestCmd>, _> =
            ScriptInterpreter::new("/no/such/script.txt");
        assert!(matches!(r, Err(ScriptError::ScriptNotFound(_))));
    }
}
