//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "ARM_SIM_ROOT";

/// Get the software root directory, as set by the `ARM_SIM_ROOT` environment
/// variable.
///
/// The root contains the `params` directory and is where sessions are
/// created.
pub fn get_arm_sim_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Retrieve uname information.
pub fn get_uname() -> std::io::Result<uname::Info> {
    uname::uname()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_uname() {
        let info = get_uname().unwrap();
        assert!(!info.sysname.is_empty());
        assert!(!info.nodename.is_empty());
        assert!(!info.machine.is_empty());
    }
}
