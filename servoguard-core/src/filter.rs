//! Fixed-Window Moving-Average Filter
//!
//! ## Overview
//!
//! A rectangular moving average over integer samples, maintained
//! incrementally: one slot overwrite, one subtraction, one addition
//! per ingested sample, never a full-buffer scan. The window length is
//! chosen at construction and fixed for the life of the filter, so the
//! filter is O(1) per sample and O(len) in memory regardless of how
//! long the input stream runs.
//!
//! ## Memory Layout
//!
//! ```text
//! MovingAverage, len = 5:
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  0  │  0  │  x₁ │  x₂ │  x₃ │   ← slots, zero-initialized
//! └─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!              cursor: next slot to overwrite, wraps after the last
//! ```
//!
//! Unfilled slots hold zero, so the first `len - 1` outputs are
//! averages over a partially zero-padded window and ramp up from zero
//! toward the signal. Callers that need an unbiased start must discard
//! the ramp-up outputs themselves.
//!
//! ## Division Semantics
//!
//! The output is `sum / len` with truncating integer division (toward
//! zero), the fixed-point convention of the monitored system. Exact
//! reproducibility of recorded streams matters more here than the
//! half-tick of statistical accuracy rounding would buy.
//!
//! There is deliberately no peek or reset: recalibration is performed
//! by the domain layer adjusting the filter's *input* (an offset), not
//! by reaching into filter state.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec};

use crate::errors::{ConfigError, ConfigResult};

/// Fixed-window moving average over `i32` samples.
///
/// Two filters constructed with the same length and fed the same
/// inputs produce the same outputs; there is no shared or global
/// state.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Window slots, addressed circularly.
    buf: Box<[i32]>,
    /// Index of the next slot to overwrite.
    cursor: usize,
    /// Sum of all values currently in `buf`.
    ///
    /// Held in i64 so a full window of extreme i32 samples cannot
    /// overflow. Invariant: always equals the sum of the slots.
    sum: i64,
}

impl MovingAverage {
    /// Create a filter with the given window length, zero-filled.
    ///
    /// A zero-length window has no meaning; the caller gets a typed
    /// error and decides whether that is fatal.
    pub fn new(len: usize) -> ConfigResult<Self> {
        if len == 0 {
            return Err(ConfigError::ZeroFilterLength);
        }

        Ok(Self {
            buf: vec![0; len].into_boxed_slice(),
            cursor: 0,
            sum: 0,
        })
    }

    /// Window length chosen at construction.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Ingest one sample and return the current window average.
    ///
    /// Drops the oldest sample from the running sum, stores the new
    /// one, advances the cursor circularly, and returns
    /// `sum / len` truncated toward zero.
    pub fn run(&mut self, x: i32) -> i32 {
        self.sum -= i64::from(self.buf[self.cursor]);
        self.sum += i64::from(x);

        self.buf[self.cursor] = x;
        self.cursor = (self.cursor + 1) % self.buf.len();

        let y = (self.sum / self.buf.len() as i64) as i32;

        log_debug!("{{{}, {}}}, sum = {}", x, y, self.sum);

        y
    }
}
