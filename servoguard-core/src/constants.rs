//! Constants for the monitored drivetrain and pipeline defaults
//!
//! All numeric values used by the cross-check live here with their
//! source. The drivetrain ratios come from the physical system being
//! monitored and must not be re-derived inline.

/// Encoder ticks per motor revolution.
pub const ENC_TICKS_PER_MOTOR_REV: f32 = 2048.0;

/// Motor revolutions per output revolution (gearbox reduction).
pub const MOTOR_REVS_PER_OUTPUT_REV: f32 = 30.0;

/// Potentiometer ticks over one output revolution.
pub const POT_TICKS_PER_OUTPUT_REV: f32 = 255.0;

/// Conversion gain from potentiometer ticks to encoder ticks.
///
/// 2048 enc-ticks/motor-rev × 30 motor-revs/out-rev ÷ 255
/// pot-ticks/out-rev ≈ 240.94 enc-ticks per pot-tick.
pub const POT_TO_ENC_GAIN: f32 =
    ENC_TICKS_PER_MOTOR_REV * MOTOR_REVS_PER_OUTPUT_REV / POT_TICKS_PER_OUTPUT_REV;

/// End of the startup calibration window, in seconds.
///
/// Within this window the two sensors are expected to be co-located,
/// so any instantaneous discrepancy is sensor offset, not a fault.
pub const CAL_WINDOW_END_S: f32 = 0.5;

/// Calibration checkpoints per second inside the startup window.
///
/// Checkpoints lie on a 0.1 s grid, i.e. at timestamps whose value
/// times this rate is a whole number.
pub const CAL_GRID_RATE_HZ: f32 = 10.0;

/// Tolerance for the checkpoint grid test, applied to the
/// grid-rate-scaled timestamp.
pub const CAL_GRID_EPSILON: f32 = 1e-4;

/// Default moving-average window length, either channel.
pub const DEFAULT_FILTER_LEN: usize = 400;

/// Default anomaly tolerance, in encoder ticks.
pub const DEFAULT_ERROR_LIMIT: i32 = 400;

/// Divisor turning the summed filter lengths into the default phase
/// lag in seconds: lag = (e_len + p_len) / 4000.
///
/// Models the assumption that filter-induced delay scales with window
/// length at the nominal sample rate.
pub const PHASE_LAG_DIVISOR: f32 = 4000.0;
