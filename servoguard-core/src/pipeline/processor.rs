//! Stream integration for the cross-check pipeline
//!
//! Connects a sample stream to a [`ServoPipeline`] while leaving the
//! loop (and therefore echo, fault reporting, and stop-at-first-
//! failure policy) to the caller.

use crate::{
    pipeline::{SampleOutcome, ServoPipeline},
    sample::ServoSample,
    stream::Stream,
};

/// Counters for one processing run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessingStats {
    /// Samples pulled from the stream and processed.
    pub samples_processed: usize,
    /// Samples that exceeded the anomaly tolerance.
    pub faults: usize,
    /// Recalibration checkpoints hit.
    pub recalibrations: usize,
}

/// Pulls samples from a stream and drives a pipeline over them.
///
/// ## Usage
///
/// ```rust
/// use servoguard_core::{
///     PipelineConfig, ServoPipeline, ServoSample, StreamProcessor, StreamError,
/// };
/// use servoguard_core::stream::MemoryStream;
///
/// let samples = [ServoSample::new(0.0, 0, 0)];
/// let stream = MemoryStream::new(&samples);
/// let pipeline = ServoPipeline::new(&PipelineConfig::default()).unwrap();
/// let mut processor = StreamProcessor::new(stream, pipeline);
///
/// loop {
///     match processor.process_next() {
///         Ok(outcome) => { /* echo, report faults */ }
///         Err(nb::Error::Other(StreamError::EndOfStream)) => break,
///         Err(_) => break, // transport or format error: run is over
///     }
/// }
/// ```
pub struct StreamProcessor<S: Stream<Item = ServoSample>> {
    stream: S,
    pipeline: ServoPipeline,
    stats: ProcessingStats,
}

impl<S: Stream<Item = ServoSample>> StreamProcessor<S> {
    /// Create a processor over a stream and a configured pipeline.
    pub fn new(stream: S, pipeline: ServoPipeline) -> Self {
        Self {
            stream,
            pipeline,
            stats: ProcessingStats::default(),
        }
    }

    /// Pull the next sample, run the pipeline, return the outcome.
    ///
    /// Stream errors pass through untouched; the pipeline state is
    /// only advanced when a sample was actually delivered.
    pub fn process_next(&mut self) -> nb::Result<SampleOutcome, S::Error> {
        let sample = self.stream.poll_next()?;

        self.stats.samples_processed += 1;

        let outcome = self.pipeline.process(sample);
        if outcome.fault.is_some() {
            self.stats.faults += 1;
        }
        if outcome.recalibrated {
            self.stats.recalibrations += 1;
        }

        Ok(outcome)
    }

    /// Counters for this run.
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// The pipeline being driven.
    pub fn pipeline(&self) -> &ServoPipeline {
        &self.pipeline
    }

    /// Mutable access to the pipeline being driven.
    pub fn pipeline_mut(&mut self) -> &mut ServoPipeline {
        &mut self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pipeline::PipelineConfig,
        stream::{MemoryStream, StreamError},
    };

    fn test_pipeline(error_limit: i32) -> ServoPipeline {
        ServoPipeline::new(&PipelineConfig {
            encoder_filter_len: 1,
            pot_filter_len: 1,
            error_limit,
            phase_lag: Some(0.0),
            filter_encoder: false,
            track_stats: false,
        })
        .unwrap()
    }

    #[test]
    fn counts_samples_and_faults() {
        let samples = [
            ServoSample::new(0.55, 0, 0),
            ServoSample::new(0.56, 500, 0),
            ServoSample::new(0.57, 0, 0),
        ];
        let mut processor =
            StreamProcessor::new(MemoryStream::new(&samples), test_pipeline(50));

        let mut faults = 0;
        loop {
            match processor.process_next() {
                Ok(outcome) => {
                    if outcome.fault.is_some() {
                        faults += 1;
                    }
                }
                Err(nb::Error::Other(StreamError::EndOfStream)) => break,
                Err(e) => panic!("unexpected stream error: {:?}", e),
            }
        }

        assert_eq!(faults, 1);
        assert_eq!(processor.stats().samples_processed, 3);
        assert_eq!(processor.stats().faults, 1);
        assert_eq!(processor.stats().recalibrations, 0);
    }

    #[test]
    fn counts_recalibrations() {
        let samples = [
            ServoSample::new(0.0, 0, 0),
            ServoSample::new(0.1, 0, 0),
            ServoSample::new(0.15, 0, 0),
        ];
        let mut processor =
            StreamProcessor::new(MemoryStream::new(&samples), test_pipeline(50));

        while processor.process_next().is_ok() {}

        assert_eq!(processor.stats().recalibrations, 2);
    }
}
