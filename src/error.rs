//! Error type for the fallible edges of the crate.
//!
//! Widget operations themselves are total: bad keystrokes are dropped by the
//! mask and stale ticks are ignored. Errors only surface where text enters the
//! program from outside the UI, such as a mask pattern or a `--time` argument.

/// Errors produced while building widgets from external input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A timer value did not fill the `MM:SS` pattern.
    #[error("invalid timer value {0:?}: expected MM:SS")]
    InvalidTimerValue(String),

    /// A mask pattern could not be compiled.
    #[error("invalid mask pattern {pattern:?}: {reason}")]
    InvalidMask {
        /// The pattern as given.
        pattern: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The log file could not be opened.
    #[error("failed to open log file: {0}")]
    Log(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
