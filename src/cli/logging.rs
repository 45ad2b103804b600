//! Tracing setup.
//!
//! Diagnostics go to stderr, filtered by `AGENTMUX_LOG` or `--verbose`.
//! Bootstrap runs additionally append every `agentmux` event at debug level
//! to the persistent run log.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::constants;

/// Build the stderr filter from `AGENTMUX_LOG`, falling back to the verbosity flag.
pub fn stderr_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("agentmux=debug")
        } else {
            EnvFilter::new("agentmux=warn")
        }
    })
}

/// Open the run log for appending and write a run banner.
fn open_run_log(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "\n=== agentmux {} run started {} ===",
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S %z")
    )?;
    Ok(file)
}

/// Install the global subscriber.
///
/// When `run_log` is given and can be opened, a second layer mirrors events
/// into it. Failure to open the log is reported but not fatal.
pub fn init(verbose: bool, run_log: Option<&Path>) {
    let mut log_error = None;
    let file_layer = run_log.and_then(|path| match open_run_log(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .with_filter(EnvFilter::new("agentmux=debug")),
        ),
        Err(e) => {
            log_error = Some((path.to_path_buf(), e));
            None
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
                .with_filter(stderr_filter(verbose)),
        )
        .with(file_layer)
        .init();

    if let Some((path, e)) = log_error {
        tracing::warn!(path = %path.display(), error = %e, "cannot open run log");
    }
}
