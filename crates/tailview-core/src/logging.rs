//! File logging for the native driver
//!
//! Engine message flow goes out at `debug` and `trace`. A rejected filter or
//! highlight config logs at `warn`, as does a recoverable action failure.
//! I/O and configuration failures log at `error`.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Install the daily rolling log file under [`data_directory`]`/logs`.
///
/// Nothing is written to stdout, which carries the headless NDJSON stream.
/// `TAILVIEW_LOG` takes an `EnvFilter` directive:
///
/// ```bash
/// TAILVIEW_LOG=tailview_app=debug tailview --frames < frames.ndjson
/// ```
pub fn init() -> Result<()> {
    let log_dir = data_directory().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "tailview.log");

    let env_filter = EnvFilter::try_from_env("TAILVIEW_LOG")
        .unwrap_or_else(|_| EnvFilter::new("tailview=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("tailview {} logging to {}", env!("CARGO_PKG_VERSION"), log_dir.display());

    Ok(())
}

/// `tailview` under the per-user data dir; the native theme file lives here too
pub fn data_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("tailview")
}
