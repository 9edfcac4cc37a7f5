//! Error types for pipeline and filter construction
//!
//! Construction errors are kept small and `Copy`: they carry no
//! context beyond the variant because the caller already knows which
//! configuration it passed. Stream errors live in [`crate::stream`]
//! next to the stream types they describe.

use thiserror_no_std::Error;

/// Result type for construction from configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building a filter or pipeline from configuration.
///
/// A filter with no window, or a tolerance of zero, is meaningless to
/// every caller; whether that aborts the process is the caller's call,
/// not this crate's.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Moving-average window length was zero.
    #[error("filter length must be at least 1")]
    ZeroFilterLength,

    /// Anomaly tolerance was zero or negative.
    #[error("error limit must be at least 1")]
    ZeroErrorLimit,
}
