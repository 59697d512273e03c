//! scoreclock: a terminal countdown clock and scoreboard.

use anyhow::Context;
use bubbletea_rs::Program;
use scoreclock::board::{self, Model as Board};
use scoreclock::config::Config;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

/// Sends logs to `--log-file` when given. The terminal belongs to the UI, so
/// without a log file nothing is logged.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(());
    };

    let directives = config.log_directives();
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {:?}", directives))?;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(scoreclock::Error::from)
        .with_context(|| format!("cannot open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(file)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let settings = config.settings();
    info!(
        time = %settings.timer,
        scores = settings.scores.is_some(),
        big = settings.big_digits,
        "starting scoreclock"
    );
    board::install(settings);

    let program = Program::<Board>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()
        .context("failed to build terminal program")?;
    program.run().await.context("terminal program failed")?;

    info!("scoreclock exited");
    Ok(())
}
