//! Clock-face formatting and `MM:SS` timer values.
//!
//! [`ClockFace`] turns a remaining duration into whole minutes and seconds for
//! display. [`TimerValue`] is the text the user edits; its parse is the
//! target duration the countdown starts from.
//!
//! ```rust
//! use scoreclock::duration::{format, TimerValue};
//! use std::time::Duration;
//!
//! assert_eq!(format(90_000).to_string(), "01:30");
//!
//! let value = TimerValue::new("1000");
//! assert_eq!(value.as_str(), "10:00");
//! assert_eq!(value.target(), Duration::from_secs(600));
//! ```

use crate::error::Error;
use crate::mask::Mask;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default value of a freshly created clock.
pub const DEFAULT_TIMER_VALUE: &str = "10:00";

/// Whole minutes and seconds of a duration.
///
/// Minutes are not folded into hours, so a 99:59 countdown reads `99:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ClockFace {
    /// Total whole minutes.
    pub minutes: u64,
    /// Remaining whole seconds, `0..60`.
    pub seconds: u64,
}

impl ClockFace {
    /// Splits a millisecond count into minutes and seconds, flooring any
    /// sub-second remainder.
    pub fn from_millis(ms: u64) -> Self {
        let total_secs = ms / 1_000;
        Self {
            minutes: total_secs / 60,
            seconds: total_secs % 60,
        }
    }

    /// Splits a [`Duration`], see [`ClockFace::from_millis`].
    pub fn from_duration(d: Duration) -> Self {
        Self::from_millis(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for ClockFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl From<Duration> for ClockFace {
    fn from(d: Duration) -> Self {
        Self::from_duration(d)
    }
}

/// Formats a remaining millisecond count as a [`ClockFace`].
pub fn format(remaining_ms: u64) -> ClockFace {
    ClockFace::from_millis(remaining_ms)
}

/// User-editable `MM:SS` text, always constrained by the time mask.
///
/// Partial values such as `"1"` or `"10:"` are legal while the user is typing;
/// missing fields count as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerValue(String);

impl TimerValue {
    /// Masks `raw` and wraps the result.
    pub fn new(raw: &str) -> Self {
        Self(Mask::time().apply(raw))
    }

    /// The masked text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Minutes and seconds fields; a missing or empty field is zero.
    pub fn fields(&self) -> (u64, u64) {
        let mut parts = self.0.split(':');
        let mut next = || {
            parts
                .next()
                .and_then(|p| p.parse::<u64>().ok())
                .unwrap_or(0)
        };
        let minutes = next();
        let seconds = next();
        (minutes, seconds)
    }

    /// The target duration: `minutes * 60s + seconds * 1s`.
    ///
    /// Seconds above 59 are not normalised, `"00:90"` is ninety seconds.
    pub fn target(&self) -> Duration {
        let (minutes, seconds) = self.fields();
        Duration::from_secs(minutes * 60 + seconds)
    }

    /// The target duration in milliseconds.
    pub fn target_ms(&self) -> u64 {
        let (minutes, seconds) = self.fields();
        minutes * 60_000 + seconds * 1_000
    }
}

impl Default for TimerValue {
    fn default() -> Self {
        Self(DEFAULT_TIMER_VALUE.to_string())
    }
}

impl fmt::Display for TimerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strict parse for values coming from outside the UI: the text must already
/// be a complete `MM:SS`.
impl FromStr for TimerValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mask = Mask::time();
        if mask.is_complete(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidTimerValue(s.to_string()))
        }
    }
}
