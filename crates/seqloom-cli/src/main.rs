mod config;
mod plan;
mod telemetry;

use clap::Parser;
use config::{CliArgs, ToolConfig};
use plan::SequencePlan;
use seqloom::MonotonicClock;
use std::io::{BufWriter, Write};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ToolConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    // One clock shared by every generator keeps the parts of a line on the
    // same timeline.
    let plan = SequencePlan::build(&config, MonotonicClock::new())?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..config.count {
        writeln!(out, "{}", plan.next_value()?)?;
    }
    out.flush()?;

    tracing::debug!(count = config.count, "finished");
    Ok(())
}

fn log_startup_info(config: &ToolConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Generating with full config: {:#?}", config);
    } else {
        tracing::debug!(
            count = config.count,
            parts = ?config.parts,
            "Generating values"
        );
    }
}
