//! # Simulation commands
//!
//! Commands which can be scripted into a simulation run. In a script each
//! command is a JSON object tagged with its `type`, for example
//! `{"type": "WinchSpeed", "rps": -0.5}`.

use serde::{Deserialize, Serialize};

/// A scripted simulation command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCmd {
    /// Drive the winch spool at the given speed, positive unspools.
    WinchSpeed { rps: f64 },

    OpenGrabber,

    CloseGrabber,

    /// Stop the winch.
    Stop,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        assert_eq!(
            serde_json::from_str::<SimCmd>(r#"{"type": "WinchSpeed", "rps": -0.5}"#).unwrap(),
            SimCmd::WinchSpeed { rps: -0.5 }
        );
        assert_eq!(
            serde_json::from_str::<SimCmd>(r#"{"type": "OpenGrabber"}"#).unwrap(),
            SimCmd::OpenGrabber
        );
        assert!(serde_json::from_str::<SimCmd>(r#"{"type": "Explode"}"#).is_err());
    }
}
