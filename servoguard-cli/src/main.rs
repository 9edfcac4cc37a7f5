//! servoguard: compare servo motor sensor data for failures
//!
//! Reads a recorded `<time> <encoder> <pot>` data file, smooths and
//! aligns the two channels through [`servoguard_core`], and reports
//! every sample where the sensors disagree beyond the configured
//! tolerance. Exits zero only when the whole file passes.

mod logger;
mod opts;

use std::io::Write;
use std::process;

use servoguard_core::{
    stream::FileStream, PipelineConfig, ServoPipeline, StreamError, StreamProcessor, VERSION,
};

use opts::{Command, Opts};

fn print_version() {
    println!("servoguard {}", VERSION);
}

fn print_usage(opts: &Opts) {
    print_version();

    let config = pipeline_config(opts);
    let phase_lag = config
        .phase_lag
        .unwrap_or_else(|| config.derived_phase_lag());

    eprintln!(
        "servoguard - Servo motor sensor check.\n\
         Usage: servoguard [flags] data-file\n\
         Option flags:\n\
         \x20 -h --help          - Show this help and exit.\n\
         \x20 -v --verbose       - Verbose execution.\n\
         \x20 -V --version       - Display the program version number.\n\
         \x20 --e-len            - Encoder filter length (e-len > 1).  Default: '{}'.\n\
         \x20 --p-len            - Potentiometer filter length (p-len > 1).  Default: '{}'.\n\
         \x20 --error-limit      - Error detection limit (error-limit > 1).  Default: '{}'.\n\
         \x20 --phase-lag        - Phase adjustment in seconds.  Default: '{:.6}'.\n\
         \x20 -f --show-filtered - Print filtered signal data to stdout.\n\
         \x20 -s --show-stats    - Print signal stats to stdout at program exit.",
        opts.e_len, opts.p_len, opts.error_limit, phase_lag
    );
}

fn pipeline_config(opts: &Opts) -> PipelineConfig {
    PipelineConfig {
        encoder_filter_len: opts.e_len,
        pot_filter_len: opts.p_len,
        error_limit: opts.error_limit,
        phase_lag: opts.phase_lag,
        filter_encoder: false,
        track_stats: opts.show_stats,
    }
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Install the logger before parsing so parse failures have
    // somewhere to go; -v only changes the level.
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    logger::init(verbose);

    let opts = match opts::parse(args.into_iter()) {
        Ok(Command::Help) => {
            print_usage(&Opts::default());
            return 0;
        }
        Ok(Command::Version) => {
            print_version();
            return 0;
        }
        Ok(Command::Run(opts)) => opts,
        Err(msg) => {
            log::error!("{}", msg);
            print_usage(&Opts::default());
            return 1;
        }
    };

    let pipeline = match ServoPipeline::new(&pipeline_config(&opts)) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("{}", e);
            print_usage(&opts);
            return 1;
        }
    };

    let stream = match FileStream::open(&opts.file_name) {
        Ok(stream) => stream,
        Err(e) => {
            log::error!("open '{}' failed: {}", opts.file_name, e);
            return 1;
        }
    };

    let mut processor = StreamProcessor::new(stream, pipeline);
    let mut failed = false;

    loop {
        match processor.process_next() {
            Ok(outcome) => {
                if opts.show_filtered {
                    let f = outcome.filtered;
                    println!("{:.6} {} {}", f.time, f.encoder, f.pot);
                }

                if let Some(fault) = outcome.fault {
                    // Surface faults as soon as they are detected.
                    println!("Sensor Error: {:.6}", fault.time);
                    let _ = std::io::stdout().flush();
                    failed = true;

                    // With no echo and no stats requested there is
                    // nothing to learn from the rest of the stream.
                    if !opts.show_filtered && !opts.show_stats {
                        break;
                    }
                }
            }
            Err(nb::Error::WouldBlock) => continue,
            Err(nb::Error::Other(StreamError::EndOfStream)) => break,
            Err(nb::Error::Other(e)) => {
                log::error!("read '{}' failed, line {}: {}",
                    opts.file_name,
                    processor.stats().samples_processed + 1,
                    e
                );
                return 1;
            }
        }
    }

    if !failed {
        println!("System OK");
    }

    if opts.show_stats {
        print!("{}", processor.pipeline().stats());
    }

    if failed {
        1
    } else {
        0
    }
}
