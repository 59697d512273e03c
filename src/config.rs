//! Command line configuration.

use crate::board::Settings;
use crate::duration::TimerValue;
use crate::score::DEFAULT_LABEL;
use clap::Parser;
use std::path::PathBuf;

/// Environment variable holding a log filter for this program.
pub const LOG_ENV: &str = "SCORECLOCK_LOG";

/// Standard log filter variable, read when [`LOG_ENV`] is not set.
pub const DEFAULT_LOG_ENV: &str = "RUST_LOG";

/// Terminal countdown clock and scoreboard.
#[derive(Parser, Debug, Clone)]
#[command(name = "scoreclock")]
#[command(about = "A terminal countdown clock and scoreboard")]
#[command(version)]
pub struct Config {
    /// Starting time as MM:SS
    #[arg(short, long, default_value = "10:00")]
    pub time: TimerValue,

    /// Show home and away score panels next to the clock
    #[arg(long)]
    pub scores: bool,

    /// Label of the home score panel
    #[arg(long, default_value = DEFAULT_LABEL)]
    pub home: String,

    /// Label of the away score panel
    #[arg(long, default_value = DEFAULT_LABEL)]
    pub away: String,

    /// Draw the clock with large block digits
    #[arg(short, long)]
    pub big: bool,

    /// Append logs to this file; nothing is logged without it
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used when neither SCORECLOCK_LOG nor RUST_LOG is set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parses the process arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Board settings described by this configuration.
    pub fn settings(&self) -> Settings {
        Settings {
            timer: self.time.clone(),
            scores: self.scores.then(|| (self.home.clone(), self.away.clone())),
            big_digits: self.big,
        }
    }

    /// Log filter directives from the environment, falling back to
    /// `--log-level` for this crate.
    pub fn log_directives(&self) -> String {
        log_directives(
            std::env::var(LOG_ENV).ok(),
            std::env::var(DEFAULT_LOG_ENV).ok(),
            &self.log_level,
        )
    }
}

/// Picks the first non-blank filter of `own` and `rust_log`, else
/// `scoreclock=<level>`.
fn log_directives(own: Option<String>, rust_log: Option<String>, level: &str) -> String {
    [own, rust_log]
        .into_iter()
        .flatten()
        .find(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| format!("scoreclock={}", level))
}
