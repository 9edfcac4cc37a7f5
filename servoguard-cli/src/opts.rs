//! Command-line option parsing
//!
//! Hand-rolled over the argument iterator: flags, `--flag value` and
//! `--flag=value` forms, one required positional data file. Parse
//! failures come back as messages for the caller to log before it
//! prints usage and exits nonzero.

use servoguard_core::constants::{DEFAULT_ERROR_LIMIT, DEFAULT_FILTER_LEN};

/// Parsed options for a processing run.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Enable debug-level diagnostics.
    pub verbose: bool,
    /// Encoder filter window length.
    pub e_len: usize,
    /// Potentiometer filter window length.
    pub p_len: usize,
    /// Anomaly tolerance in encoder ticks.
    pub error_limit: i32,
    /// Phase adjustment in seconds; derived from the filter lengths
    /// when not given.
    pub phase_lag: Option<f32>,
    /// Print each filtered pair to stdout.
    pub show_filtered: bool,
    /// Print signal stats to stdout at exit.
    pub show_stats: bool,
    /// Input data file.
    pub file_name: String,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            verbose: false,
            e_len: DEFAULT_FILTER_LEN,
            p_len: DEFAULT_FILTER_LEN,
            error_limit: DEFAULT_ERROR_LIMIT,
            phase_lag: None,
            show_filtered: false,
            show_stats: false,
            file_name: String::new(),
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Process a data file with the given options.
    Run(Opts),
    /// Print usage and exit successfully.
    Help,
    /// Print the version and exit successfully.
    Version,
}

/// Parse the argument list (program name already stripped).
pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Command, String> {
    let mut opts = Opts::default();
    let mut help = false;
    let mut version = false;
    let mut file_name: Option<String> = None;

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };

        match flag.as_str() {
            "-h" | "--help" => help = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-V" | "--version" => version = true,
            "-f" | "--show-filtered" => opts.show_filtered = true,
            "-s" | "--show-stats" => opts.show_stats = true,
            "--e-len" => {
                opts.e_len = parse_count(&flag, take_value(&flag, inline, &mut args)?)?;
            }
            "--p-len" => {
                opts.p_len = parse_count(&flag, take_value(&flag, inline, &mut args)?)?;
            }
            "--error-limit" => {
                let value = take_value(&flag, inline, &mut args)?;
                opts.error_limit = value
                    .parse::<i32>()
                    .ok()
                    .filter(|v| *v >= 0)
                    .ok_or_else(|| format!("bad value for '{}': '{}'", flag, value))?;
            }
            "--phase-lag" => {
                let value = take_value(&flag, inline, &mut args)?;
                opts.phase_lag = Some(
                    value
                        .parse::<f32>()
                        .map_err(|_| format!("bad value for '{}': '{}'", flag, value))?,
                );
            }
            _ if flag.starts_with('-') => {
                return Err(format!("unknown flag: '{}'", arg));
            }
            _ => {
                if file_name.is_some() {
                    return Err(format!("found extra argument: '{}'", arg));
                }
                file_name = Some(arg);
            }
        }
    }

    if help {
        return Ok(Command::Help);
    }
    if version {
        return Ok(Command::Version);
    }

    if opts.e_len == 0 {
        return Err(format!("<e-len> out of range: {}", opts.e_len));
    }
    if opts.p_len == 0 {
        return Err(format!("<p-len> out of range: {}", opts.p_len));
    }
    if opts.error_limit == 0 {
        return Err(format!("<error-limit> out of range: {}", opts.error_limit));
    }

    opts.file_name = file_name.ok_or_else(|| "please specify a data-file".to_string())?;

    Ok(Command::Run(opts))
}

fn take_value<I: Iterator<Item = String>>(
    flag: &str,
    inline: Option<String>,
    args: &mut I,
) -> Result<String, String> {
    match inline {
        Some(v) => Ok(v),
        None => args
            .next()
            .ok_or_else(|| format!("missing value for '{}'", flag)),
    }
}

fn parse_count(flag: &str, value: String) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("bad value for '{}': '{}'", flag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Result<Command, String> {
        parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_with_file_only() {
        let cmd = parse_args(&["data.txt"]).unwrap();
        match cmd {
            Command::Run(opts) => {
                assert_eq!(opts.e_len, 400);
                assert_eq!(opts.p_len, 400);
                assert_eq!(opts.error_limit, 400);
                assert_eq!(opts.phase_lag, None);
                assert!(!opts.show_filtered);
                assert!(!opts.show_stats);
                assert_eq!(opts.file_name, "data.txt");
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn long_flags_with_separate_and_inline_values() {
        let a = parse_args(&["--e-len", "16", "--p-len=32", "data.txt"]).unwrap();
        let b = parse_args(&["--e-len=16", "--p-len", "32", "data.txt"]).unwrap();
        assert_eq!(a, b);

        if let Command::Run(opts) = a {
            assert_eq!(opts.e_len, 16);
            assert_eq!(opts.p_len, 32);
        }
    }

    #[test]
    fn presentation_flags() {
        let cmd = parse_args(&["-f", "-s", "-v", "data.txt"]).unwrap();
        if let Command::Run(opts) = cmd {
            assert!(opts.show_filtered);
            assert!(opts.show_stats);
            assert!(opts.verbose);
        } else {
            panic!("expected Run");
        }
    }

    #[test]
    fn phase_lag_parses_as_float() {
        let cmd = parse_args(&["--phase-lag", "0.125", "data.txt"]).unwrap();
        if let Command::Run(opts) = cmd {
            assert_eq!(opts.phase_lag, Some(0.125));
        } else {
            panic!("expected Run");
        }
    }

    #[test]
    fn help_wins_over_missing_file() {
        assert_eq!(parse_args(&["-h"]).unwrap(), Command::Help);
        assert_eq!(parse_args(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn extra_positional_is_an_error() {
        let err = parse_args(&["a.txt", "b.txt"]).unwrap_err();
        assert!(err.contains("extra argument"));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(parse_args(&["--frobnicate", "data.txt"]).is_err());
    }

    #[test]
    fn zero_lengths_are_rejected() {
        assert!(parse_args(&["--e-len", "0", "data.txt"]).is_err());
        assert!(parse_args(&["--p-len", "0", "data.txt"]).is_err());
        assert!(parse_args(&["--error-limit", "0", "data.txt"]).is_err());
    }

    #[test]
    fn negative_error_limit_is_rejected() {
        assert!(parse_args(&["--error-limit", "-5", "data.txt"]).is_err());
    }
}
