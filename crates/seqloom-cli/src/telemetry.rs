//! Console logging for the `seqloom` binary.
//!
//! Log output goes to stderr so that stdout carries nothing but generated
//! values. The filter is read from `RUST_LOG` and defaults to `info`; set
//! `RUST_LOG=seqloom=trace` to see every generation attempt.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_file(true),
        )
        .try_init()?;
    Ok(())
}
