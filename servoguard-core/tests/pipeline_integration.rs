//! Integration tests for the cross-check pipeline
//!
//! Drives complete sample streams through `StreamProcessor` and
//! checks faults, calibration behavior, and epoch-scoped statistics.

use servoguard_core::{
    stream::{MemoryStream, StreamError},
    PipelineConfig, SampleOutcome, ServoPipeline, ServoSample, StreamProcessor,
};

fn run_all<'a>(
    samples: &'a [ServoSample],
    config: &PipelineConfig,
) -> (Vec<SampleOutcome>, StreamProcessor<MemoryStream<'a>>) {
    let pipeline = ServoPipeline::new(config).unwrap();
    let mut processor = StreamProcessor::new(MemoryStream::new(samples), pipeline);
    let mut outcomes = Vec::new();

    loop {
        match processor.process_next() {
            Ok(outcome) => outcomes.push(outcome),
            Err(nb::Error::Other(StreamError::EndOfStream)) => break,
            Err(e) => panic!("unexpected stream error: {:?}", e),
        }
    }

    (outcomes, processor)
}

#[test]
fn constant_disagreement_faults_every_sample() {
    // Encoder pinned at 100 while the pot reads zero: with unit
    // windows and a limit of 50 every sample must fail.
    let samples = [
        ServoSample::new(0.0, 100, 0),
        ServoSample::new(0.1, 100, 0),
        ServoSample::new(0.2, 100, 0),
    ];
    let config = PipelineConfig {
        encoder_filter_len: 1,
        pot_filter_len: 1,
        error_limit: 50,
        ..PipelineConfig::default()
    };

    let (outcomes, processor) = run_all(&samples, &config);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.fault.is_some()));
    assert_eq!(processor.stats().faults, 3);

    // Every timestamp sits on the startup grid, so each sample also
    // recalibrated (to a zero pot offset, which changes nothing).
    assert_eq!(processor.stats().recalibrations, 3);
}

#[test]
fn agreeing_channels_pass() {
    // Pot tick 1 scales to 240 encoder ticks; encoder tracks it.
    let samples = [
        ServoSample::new(0.55, 240, 1),
        ServoSample::new(0.56, 241, 1),
        ServoSample::new(0.57, 238, 1),
    ];
    let config = PipelineConfig {
        encoder_filter_len: 1,
        pot_filter_len: 1,
        error_limit: 50,
        ..PipelineConfig::default()
    };

    let (outcomes, processor) = run_all(&samples, &config);

    assert!(outcomes.iter().all(|o| o.fault.is_none()));
    assert_eq!(processor.stats().faults, 0);
}

#[test]
fn startup_offset_absorbs_static_misalignment() {
    // The pot is mechanically offset by 2 ticks (≈481 encoder ticks),
    // far beyond the limit. The t = 0.0 checkpoint anchors the offset
    // from the sample it lands on, so that sample still faults, but
    // later samples with the same misalignment net to zero and pass.
    let samples = [
        ServoSample::new(0.0, 0, 2),
        ServoSample::new(0.55, 0, 2),
        ServoSample::new(0.56, 0, 2),
    ];
    let config = PipelineConfig {
        encoder_filter_len: 1,
        pot_filter_len: 1,
        error_limit: 50,
        ..PipelineConfig::default()
    };

    let (outcomes, _) = run_all(&samples, &config);

    assert!(outcomes[0].recalibrated);
    assert!(outcomes[0].fault.is_some());
    assert!(outcomes[1..].iter().all(|o| o.fault.is_none()));
    assert_eq!(outcomes[1].filtered.pot, 0);
}

#[test]
fn fault_timestamps_carry_phase_compensation() {
    let samples = [ServoSample::new(2.0, 1000, 0)];
    let config = PipelineConfig {
        encoder_filter_len: 1,
        pot_filter_len: 1,
        error_limit: 50,
        phase_lag: Some(0.5),
        ..PipelineConfig::default()
    };

    let (outcomes, _) = run_all(&samples, &config);

    let fault = outcomes[0].fault.unwrap();
    assert!((fault.time - 1.5).abs() < 1e-6);
    assert_eq!(fault.error, 1000);
}

#[test]
fn stats_cover_only_the_current_epoch() {
    let samples = [
        // Pre-checkpoint extreme, far off the startup grid value.
        ServoSample::new(0.05, 9000, 0),
        // Checkpoint: opens a new epoch.
        ServoSample::new(0.1, 10, 0),
        // Post-checkpoint samples.
        ServoSample::new(0.55, 20, 0),
        ServoSample::new(0.56, -5, 0),
    ];
    let config = PipelineConfig {
        encoder_filter_len: 1,
        pot_filter_len: 1,
        error_limit: 100_000,
        track_stats: true,
        ..PipelineConfig::default()
    };

    let (_, processor) = run_all(&samples, &config);
    let stats = processor.pipeline().stats();

    // The 9000 extreme belongs to the closed epoch and must be gone.
    assert_eq!(stats.encoder_max().value, 20);
    assert_eq!(stats.encoder_min().value, -5);
}

#[test]
fn filtering_smooths_a_pot_spike() {
    // A one-sample pot glitch of 4 ticks (≈963 encoder ticks) against
    // a flat encoder: unfiltered it would fault, a 4-wide window
    // keeps the average inside the limit.
    let glitch = [
        ServoSample::new(0.51, 0, 0),
        ServoSample::new(0.52, 0, 0),
        ServoSample::new(0.53, 0, 4),
        ServoSample::new(0.54, 0, 0),
    ];

    let unfiltered = PipelineConfig {
        encoder_filter_len: 1,
        pot_filter_len: 1,
        error_limit: 500,
        ..PipelineConfig::default()
    };
    let (outcomes, _) = run_all(&glitch, &unfiltered);
    assert!(outcomes[2].fault.is_some());

    let filtered = PipelineConfig {
        pot_filter_len: 4,
        ..unfiltered
    };
    let (outcomes, _) = run_all(&glitch, &filtered);
    assert!(outcomes.iter().all(|o| o.fault.is_none()));
}

#[test]
fn pipelines_are_independent() {
    // Two pipelines over the same stream agree exactly; a third with
    // different state does not leak into them.
    let samples: Vec<ServoSample> = (0..50)
        .map(|i| ServoSample::new(0.51 + i as f32 * 0.01, i * 3, (i % 5) as i32))
        .collect();
    let config = PipelineConfig {
        encoder_filter_len: 1,
        pot_filter_len: 8,
        error_limit: 100_000,
        ..PipelineConfig::default()
    };

    let (a, _) = run_all(&samples, &config);
    let mut noise = ServoPipeline::new(&config).unwrap();
    noise.process(ServoSample::new(0.0, 123, 45));
    let (b, _) = run_all(&samples, &config);

    assert_eq!(a, b);
}
