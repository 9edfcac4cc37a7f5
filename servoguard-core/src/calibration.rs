//! Calibration state and the startup checkpoint predicate
//!
//! The potentiometer's zero reference is not known at power-on: the
//! two sensors report in aligned units only after an offset is
//! subtracted from the scaled potentiometer channel. During a short
//! startup window the mechanism is expected to be settled, so the
//! pipeline re-anchors that offset at fixed checkpoints inside the
//! window and treats any residual disagreement afterwards as a fault.

use libm::{fabsf, roundf};

use crate::constants::{CAL_GRID_EPSILON, CAL_GRID_RATE_HZ, CAL_WINDOW_END_S};

/// Tolerance comparison parameters plus the mutable zero reference.
///
/// `error_limit` and `phase_lag` are fixed at construction;
/// `pot_offset` starts at zero and is overwritten at each startup
/// checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    error_limit: i32,
    pot_offset: i32,
    phase_lag: f32,
}

impl Calibration {
    /// Create calibration state with a zero potentiometer offset.
    pub const fn new(error_limit: i32, phase_lag: f32) -> Self {
        Self {
            error_limit,
            pot_offset: 0,
            phase_lag,
        }
    }

    /// Anomaly tolerance in encoder ticks.
    pub const fn error_limit(&self) -> i32 {
        self.error_limit
    }

    /// Known inter-sensor measurement delay, in seconds.
    ///
    /// Subtracted from a fault's timestamp when it is reported.
    pub const fn phase_lag(&self) -> f32 {
        self.phase_lag
    }

    /// Current potentiometer zero reference, in encoder ticks.
    pub const fn pot_offset(&self) -> i32 {
        self.pot_offset
    }

    /// Re-anchor the potentiometer zero reference.
    pub fn set_pot_offset(&mut self, pot_offset: i32) {
        log_debug!("pot_offset = {}", pot_offset);
        self.pot_offset = pot_offset;
    }

    /// Whether `time` lands on a startup-window checkpoint.
    ///
    /// True when `time` is inside the startup window and lies on the
    /// checkpoint grid. The grid test compares the grid-scaled time
    /// against its nearest whole number with an epsilon; an exact
    /// float equality here would drop checkpoints to rounding noise
    /// in the timestamp.
    pub fn is_checkpoint(time: f32) -> bool {
        if time > CAL_WINDOW_END_S {
            return false;
        }

        let gridded = time * CAL_GRID_RATE_HZ;
        fabsf(roundf(gridded) - gridded) < CAL_GRID_EPSILON
    }
}
