//! Per-Sample Cross-Check Pipeline
//!
//! ## Overview
//!
//! One `ServoPipeline` owns everything needed to judge a stream of
//! paired samples: a moving-average filter per channel, the
//! calibration state, and the running statistics. Each call to
//! [`ServoPipeline::process`] takes one raw record and performs, in
//! order:
//!
//! ```text
//! raw sample ──► scale pot ──► offset + filter ──► checkpoint?
//!                                                      │
//!              outcome ◄── fault check ◄── stats ◄─────┘
//! ```
//!
//! The pipeline is a pure transducer at its boundary: it never prints,
//! never exits, and never decides whether the stream should stop. It
//! returns a [`SampleOutcome`] and leaves policy to the caller.
//!
//! ## Ordering Invariants
//!
//! - Filtering happens before the checkpoint test, so a checkpoint
//!   anchors the offset to the *filtered* reading computed under the
//!   previous offset.
//! - The stats reset happens before the stats update, so the
//!   checkpoint sample itself opens the new epoch.
//!
//! Processing is strictly sequential: every output depends on all
//! prior samples through the filter windows and the offset, so there
//! is no valid parallel decomposition within one stream. Separate
//! streams get separate pipelines and share nothing.

mod processor;

pub use processor::{ProcessingStats, StreamProcessor};

use crate::{
    calibration::Calibration,
    constants::{DEFAULT_ERROR_LIMIT, DEFAULT_FILTER_LEN, PHASE_LAG_DIVISOR, POT_TO_ENC_GAIN},
    errors::{ConfigError, ConfigResult},
    filter::MovingAverage,
    sample::ServoSample,
    stats::SignalStats,
};

/// Configuration consumed by [`ServoPipeline::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Encoder-channel filter window length.
    pub encoder_filter_len: usize,
    /// Potentiometer-channel filter window length.
    pub pot_filter_len: usize,
    /// Anomaly tolerance in encoder ticks; a sample fails only when
    /// the channel disagreement strictly exceeds this.
    pub error_limit: i32,
    /// Inter-sensor measurement delay in seconds; `None` derives
    /// `(encoder_filter_len + pot_filter_len) / 4000`.
    pub phase_lag: Option<f32>,
    /// Run the encoder channel through its filter.
    ///
    /// Off by default: the encoder is treated as ground truth and
    /// passed through raw, while the filter stays constructed and the
    /// window length configurable. The asymmetry is inherited from
    /// the monitored system's tuning, not an oversight to fix here.
    pub filter_encoder: bool,
    /// Accumulate running statistics while processing.
    pub track_stats: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            encoder_filter_len: DEFAULT_FILTER_LEN,
            pot_filter_len: DEFAULT_FILTER_LEN,
            error_limit: DEFAULT_ERROR_LIMIT,
            phase_lag: None,
            filter_encoder: false,
            track_stats: false,
        }
    }
}

impl PipelineConfig {
    /// Phase lag derived from the filter window lengths.
    ///
    /// Used when no explicit lag is configured: filter-induced delay
    /// grows with window length at the nominal sample rate.
    pub fn derived_phase_lag(&self) -> f32 {
        (self.encoder_filter_len + self.pot_filter_len) as f32 / PHASE_LAG_DIVISOR
    }
}

/// One sample exceeding the anomaly tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFault {
    /// Fault timestamp, already compensated for the phase lag.
    pub time: f32,
    /// Absolute channel disagreement, in encoder ticks.
    pub error: i32,
}

/// Result of processing one raw sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutcome {
    /// The aligned pair: encoder ticks on both channels, pot scaled,
    /// offset-corrected and filtered (encoder filtered only when
    /// engaged).
    pub filtered: ServoSample,
    /// Present when the channels disagreed beyond tolerance.
    pub fault: Option<SensorFault>,
    /// Whether this sample was a recalibration checkpoint.
    pub recalibrated: bool,
}

/// Streaming cross-check of one servo's encoder and potentiometer.
#[derive(Debug, Clone)]
pub struct ServoPipeline {
    encoder_filter: MovingAverage,
    pot_filter: MovingAverage,
    cal: Calibration,
    stats: SignalStats,
    filter_encoder: bool,
    track_stats: bool,
}

impl ServoPipeline {
    /// Build a pipeline from configuration.
    ///
    /// Filter lengths and the error limit must be nonzero; the window
    /// lengths size the two filters for the life of the pipeline.
    pub fn new(config: &PipelineConfig) -> ConfigResult<Self> {
        if config.error_limit <= 0 {
            return Err(ConfigError::ZeroErrorLimit);
        }

        let phase_lag = config.phase_lag.unwrap_or_else(|| config.derived_phase_lag());

        Ok(Self {
            encoder_filter: MovingAverage::new(config.encoder_filter_len)?,
            pot_filter: MovingAverage::new(config.pot_filter_len)?,
            cal: Calibration::new(config.error_limit, phase_lag),
            stats: SignalStats::new(config.encoder_filter_len, config.pot_filter_len),
            filter_encoder: config.filter_encoder,
            track_stats: config.track_stats,
        })
    }

    /// Process one raw sample and return its outcome.
    pub fn process(&mut self, raw: ServoSample) -> SampleOutcome {
        log_debug!("raw: {} {} {}", raw.time, raw.encoder, raw.pot);

        let scaled = scale_pot(raw.pot);
        let pot_filtered = self.pot_filter.run(scaled - self.cal.pot_offset());

        let encoder_used = if self.filter_encoder {
            self.encoder_filter.run(raw.encoder)
        } else {
            raw.encoder
        };

        let filtered = ServoSample::new(raw.time, encoder_used, pot_filtered);

        let recalibrated = Calibration::is_checkpoint(raw.time);
        if recalibrated {
            self.stats.reset();
            self.cal.set_pot_offset(pot_filtered);
        }

        if self.track_stats {
            self.stats.update(&filtered);
        }

        SampleOutcome {
            filtered,
            fault: self.check(&filtered),
            recalibrated,
        }
    }

    /// Statistics for the current calibration epoch.
    pub fn stats(&self) -> &SignalStats {
        &self.stats
    }

    /// Current calibration state.
    pub fn calibration(&self) -> &Calibration {
        &self.cal
    }

    fn check(&self, filtered: &ServoSample) -> Option<SensorFault> {
        let error = (filtered.encoder - filtered.pot).abs();

        log_debug!(
            "error = {}, headroom = {}",
            error,
            self.cal.error_limit() - error
        );

        if error > self.cal.error_limit() {
            Some(SensorFault {
                time: filtered.time - self.cal.phase_lag(),
                error,
            })
        } else {
            None
        }
    }
}

/// Convert potentiometer ticks to encoder-tick units.
///
/// Truncating conversion, matching the monitored system's fixed-point
/// arithmetic.
fn scale_pot(pot: i32) -> i32 {
    (pot as f32 * POT_TO_ENC_GAIN) as i32
}
