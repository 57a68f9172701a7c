//! Logging initialization and configuration.
//!
//! Logs are written to files so they never interleave with the console
//! conversation. Each run gets its own timestamped file.
//!
//! # Configuration
//!
//! The log level can be controlled via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - Show debug and higher level logs
//! - `RUST_LOG=info` - Show info and higher level logs (default)
//! - `RUST_LOG=warn` - Show warnings and errors only
//!
//! `--debug` / `DEBUG=true` raises the default to `debug` when `RUST_LOG` is unset.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log directory: `logs/` next to the executable, or `./logs`.
pub fn default_log_dir() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe_path) => exe_path
            .parent()
            .map(|p| p.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs")),
        Err(_) => PathBuf::from("logs"),
    }
}

/// Build the per-run log file name, e.g. `rusty-cmd.2024-12-06-14-30-25.log`.
pub fn log_file_name() -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    format!("rusty-cmd.{}.log", timestamp)
}

/// Initialize the logging system.
///
/// Returns the writer guard; keep it alive for the whole program so buffered
/// lines are flushed on exit. Returns `None` (and logs nothing) if the log file
/// cannot be created, which never prevents the program from running.
pub fn init_logging(log_dir: &Path, debug: bool) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create logs directory: {}", e);
        return None;
    }

    let log_path = log_dir.join(log_file_name());
    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {}", e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Warning: Failed to install log subscriber: {}", e);
        return None;
    }

    tracing::info!("Logging initialized - writing to {}", log_path.display());
    Some(guard)
}
