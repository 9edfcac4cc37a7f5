//! Core cross-check engine for servoguard
//!
//! Compares a servo mechanism's encoder readings against its
//! potentiometer readings, sample by sample, after smoothing each
//! channel and aligning their scales and offsets. A sample whose two
//! sensors disagree beyond a configured tolerance is flagged as a
//! sensor fault.
//!
//! Key constraints:
//! - O(1) time and O(window) memory per sample, for unbounded streams
//! - No hidden output: the pipeline returns typed outcomes, the caller
//!   decides what to print and when to stop
//! - Exact integer arithmetic where the data is integer; truncating
//!   division matches the fixed-point convention of the source system
//!
//! ```no_run
//! use servoguard_core::{PipelineConfig, ServoPipeline, ServoSample};
//!
//! let config = PipelineConfig::default();
//! let mut pipeline = ServoPipeline::new(&config).unwrap();
//!
//! let outcome = pipeline.process(ServoSample::new(0.0, 120, 0));
//! match outcome.fault {
//!     None => {},    // Sensors agree
//!     Some(f) => {}, // Disagreement beyond tolerance at f.time
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{}};
}

pub mod calibration;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod pipeline;
pub mod sample;
pub mod stats;
pub mod stream;

// Public API
pub use calibration::Calibration;
pub use errors::ConfigError;
pub use filter::MovingAverage;
pub use pipeline::{
    PipelineConfig, ProcessingStats, SampleOutcome, SensorFault, ServoPipeline, StreamProcessor,
};
pub use sample::{ServoSample, TimedReading};
pub use stats::SignalStats;
pub use stream::{Stream, StreamError};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
