//! Running signal statistics, scoped to a calibration epoch
//!
//! Tracks per-channel extremes and the single worst encoder/pot
//! disagreement seen since the last reset. The pipeline resets these
//! at every recalibration checkpoint, so a report always describes
//! the current calibration epoch only; extremes recorded under a
//! stale zero reference would say nothing about the live signal.

use core::fmt;

use crate::sample::{ServoSample, TimedReading};

/// Running min/max and worst-discrepancy statistics for one pipeline.
///
/// Updated from *filtered* pairs. The filter window lengths are kept
/// only so the report can state what smoothing produced the numbers;
/// they survive resets.
#[derive(Debug, Clone, Copy)]
pub struct SignalStats {
    e_len: usize,
    p_len: usize,
    max_diff: i32,
    max_diff_encoder: TimedReading,
    max_diff_pot: TimedReading,
    encoder_min: TimedReading,
    encoder_max: TimedReading,
    pot_min: TimedReading,
    pot_max: TimedReading,
}

impl SignalStats {
    /// Create statistics for a pipeline with the given filter lengths.
    pub fn new(e_len: usize, p_len: usize) -> Self {
        let mut stats = Self {
            e_len,
            p_len,
            max_diff: 0,
            max_diff_encoder: TimedReading::default(),
            max_diff_pot: TimedReading::default(),
            encoder_min: TimedReading::default(),
            encoder_max: TimedReading::default(),
            pot_min: TimedReading::default(),
            pot_max: TimedReading::default(),
        };
        stats.reset();
        stats
    }

    /// Start a fresh epoch: re-arm the extremes, clear the worst
    /// discrepancy. Filter lengths are preserved.
    pub fn reset(&mut self) {
        self.max_diff = 0;
        self.max_diff_encoder = TimedReading::default();
        self.max_diff_pot = TimedReading::default();
        self.encoder_min = TimedReading {
            time: 0.0,
            value: i32::MAX,
        };
        self.pot_min = TimedReading {
            time: 0.0,
            value: i32::MAX,
        };
        self.encoder_max = TimedReading {
            time: 0.0,
            value: i32::MIN,
        };
        self.pot_max = TimedReading {
            time: 0.0,
            value: i32::MIN,
        };
    }

    /// Fold one filtered pair into the epoch.
    ///
    /// A new sample that ties an extreme replaces it, so the recorded
    /// timestamp is always the most recent occurrence.
    pub fn update(&mut self, filtered: &ServoSample) {
        let encoder = filtered.encoder_reading();
        let pot = filtered.pot_reading();

        if encoder.value <= self.encoder_min.value {
            self.encoder_min = encoder;
        }
        if encoder.value >= self.encoder_max.value {
            self.encoder_max = encoder;
        }
        if pot.value <= self.pot_min.value {
            self.pot_min = pot;
        }
        if pot.value >= self.pot_max.value {
            self.pot_max = pot;
        }

        let diff = (filtered.encoder - filtered.pot).abs();
        if diff > self.max_diff {
            self.max_diff = diff;
            self.max_diff_encoder = encoder;
            self.max_diff_pot = pot;
        }
    }

    /// Worst absolute encoder/pot discrepancy seen this epoch.
    pub fn max_diff(&self) -> i32 {
        self.max_diff
    }

    /// Encoder channel minimum this epoch.
    pub fn encoder_min(&self) -> TimedReading {
        self.encoder_min
    }

    /// Encoder channel maximum this epoch.
    pub fn encoder_max(&self) -> TimedReading {
        self.encoder_max
    }

    /// Potentiometer channel minimum this epoch.
    pub fn pot_min(&self) -> TimedReading {
        self.pot_min
    }

    /// Potentiometer channel maximum this epoch.
    pub fn pot_max(&self) -> TimedReading {
        self.pot_max
    }
}

const RULE: &str =
    "------------------------------------------------------------------------";

impl fmt::Display for SignalStats {
    /// Render the end-of-run report.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "params:      e-len = {}, p-len = {}",
            self.e_len, self.p_len
        )?;
        writeln!(
            f,
            "enc:         min = {{{:.6}, {}}}, max = {{{:.6}, {}}}",
            self.encoder_min.time,
            self.encoder_min.value,
            self.encoder_max.time,
            self.encoder_max.value
        )?;
        writeln!(
            f,
            "pot:         min = {{{:.6}, {}}}, max = {{{:.6}, {}}}",
            self.pot_min.time, self.pot_min.value, self.pot_max.time, self.pot_max.value
        )?;
        let min_diff = self.pot_min.value - self.encoder_min.value;
        let max_diff = self.pot_max.value - self.encoder_max.value;
        writeln!(
            f,
            "signal diff: min = {{{:.6}, {}}}, max = {{{:.6}, {}}} => {}",
            self.pot_min.time - self.encoder_min.time,
            min_diff,
            self.pot_max.time - self.encoder_max.time,
            max_diff,
            min_diff - max_diff
        )?;
        writeln!(
            f,
            "sample diff: enc = {{{:.6}, {}}}, pot = {{{:.6}, {}}} => {}",
            self.max_diff_encoder.time,
            self.max_diff_encoder.value,
            self.max_diff_pot.time,
            self.max_diff_pot.value,
            self.max_diff
        )?;
        writeln!(f, "{}", RULE)
    }
}
