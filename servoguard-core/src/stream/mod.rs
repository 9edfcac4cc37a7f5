//! Sample streams
//!
//! Pull-based sources of [`ServoSample`](crate::sample::ServoSample)
//! records. The pipeline never does I/O itself; everything that can
//! block lives behind the [`Stream`] trait:
//! - `memory`: in-memory streams for tests and replay
//! - `file`: line-oriented data files (requires `std`)
//!
//! The trait follows a pull-based, non-blocking model via `nb`:
//! `WouldBlock` means "no data yet, ask again", any other error is a
//! real stream condition the caller must act on.

use core::fmt;

pub mod memory;

#[cfg(feature = "std")]
pub mod file;

pub use memory::MemoryStream;

#[cfg(feature = "std")]
pub use file::{FileStream, FileStreamStats};

/// Errors that can occur while pulling samples from a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// Transport-level error (e.g. I/O failure).
    Transport(E),
    /// A record failed the data-format contract.
    ///
    /// Malformed input is a data-integrity fault: the caller is
    /// expected to abort the run, not skip the record, because filter
    /// and calibration state past a bad record would be undefined.
    Format(&'static str),
    /// End of stream reached.
    EndOfStream,
    /// A record did not fit the line buffer.
    Overflow,
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::EndOfStream => write!(f, "End of stream"),
            Self::Overflow => write!(f, "Line buffer overflow"),
        }
    }
}

/// Pull-based source of samples.
///
/// Implementations should be lazy: no read happens until the consumer
/// asks. `poll_next` must not block indefinitely; `EndOfStream`
/// errors should be sticky.
pub trait Stream {
    /// Type of items produced by the stream.
    type Item;

    /// Type of errors that can occur.
    type Error;

    /// Attempt to pull the next item from the stream.
    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error>;

    /// Bounds on the remaining items, `Iterator::size_hint` style.
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}
