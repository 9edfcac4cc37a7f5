//! Memory-based sample streams for testing and replay

use super::{Stream, StreamError};
use crate::sample::ServoSample;

/// Replays a slice of samples.
///
/// ## Example
///
/// ```rust
/// use servoguard_core::stream::{MemoryStream, Stream};
/// use servoguard_core::ServoSample;
///
/// let samples = [
///     ServoSample::new(0.0, 100, 0),
///     ServoSample::new(0.1, 101, 0),
/// ];
///
/// let mut stream = MemoryStream::new(&samples);
/// while let Ok(sample) = stream.poll_next() {
///     // Process sample
/// }
/// ```
pub struct MemoryStream<'a> {
    /// Samples to replay.
    samples: &'a [ServoSample],
    /// Current position.
    position: usize,
}

impl<'a> MemoryStream<'a> {
    /// Create a stream over a slice of samples.
    pub fn new(samples: &'a [ServoSample]) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Rewind to the beginning.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Samples delivered so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every sample has been delivered.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.samples.len()
    }
}

impl<'a> Stream for MemoryStream<'a> {
    type Item = ServoSample;
    type Error = StreamError<()>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        if self.position >= self.samples.len() {
            return Err(nb::Error::Other(StreamError::EndOfStream));
        }

        let sample = self.samples[self.position];
        self.position += 1;
        Ok(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.position;
        (remaining, Some(remaining))
    }
}
