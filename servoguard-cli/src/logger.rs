//! Minimal stderr logger
//!
//! The core crate logs through the `log` facade; this backend routes
//! those records to stderr with a module-path prefix, matching the
//! diagnostic format of the original recorder tooling. `--verbose`
//! raises the level to `Debug`.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if record.level() == Level::Error {
            eprintln!("{}: ERROR: {}", record.target(), record.args());
        } else {
            eprintln!("{}: {}", record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the stderr backend. Idempotent: a second call is a no-op.
pub fn init(verbose: bool) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
}
