//! # Absolute encoder simulation
//!
//! Stands in for a duty cycle absolute encoder. The arm simulation writes
//! the arm position here, and control code reads it back exactly as it would
//! read the real sensor.

use crate::arm_sim::AbsEncoderSink;

/// Simulated absolute encoder.
#[derive(Debug, Default, Clone)]
pub struct AbsEncoderSim {
    /// Position in rotations, `[0, 1)`.
    position_rot: f64,

    /// Number of times the position has been set.
    num_writes: u64,
}

impl AbsEncoderSim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in rotations.
    pub fn get(&self) -> f64 {
        self.position_rot
    }

    /// Current position in degrees, `[0, 360)`.
    pub fn get_degrees(&self) -> f64 {
        self.position_rot * util::units::DEGREES_PER_ROTATION
    }

    pub fn num_writes(&self) -> u64 {
        self.num_writes
    }
}

impl AbsEncoderSink for AbsEncoderSim {
    fn set(&mut self, position_rot: f64) {
        self.position_rot = position_rot;
        self.num_writes += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut e = AbsEncoderSim::new();
        assert_eq!(e.get(), 0.0);
        assert_eq!(e.num_writes(), 0);

        e.set(0.25);
        assert_eq!(e.get(), 0.25);
        assert_eq!(e.get_degrees(), 90.0);
        assert_eq!(e.num_writes(), 1);
    }
}
