//! # Grabber simulation
//!
//! The grabber is either open or closed. Clones share the same state, so the
//! main loop can keep one handle to open and close the grabber while the arm
//! simulation holds another to query it.

use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::arm_sim::GrabberState;

/// Simulated grabber, closed by default.
#[derive(Debug, Default, Clone)]
pub struct GrabberSim {
    open: Rc<Cell<bool>>,
}

impl GrabberSim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        if !self.open.replace(true) {
            debug!("Grabber opened");
        }
    }

    pub fn close(&self) {
        if self.open.replace(false) {
            debug!("Grabber closed");
        }
    }
}

impl GrabberState for GrabberSim {
    fn is_open(&self) -> bool {
        self.open.get()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let g = GrabberSim::new();
        let handle = g.clone();

        assert!(!handle.is_open());
        g.open();
        assert!(handle.is_open());
        g.close();
        assert!(!handle.is_open());
    }
}
