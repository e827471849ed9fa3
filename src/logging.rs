use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/din-keeper.log";
const DEFAULT_FILE_NAME: &str = "din-keeper.log";

/// Split the configured log file into the directory the appender writes to
/// and the file name inside it.
fn log_file_location(log_file: &Path) -> (PathBuf, PathBuf) {
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = log_file
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
    (dir, name)
}

/// Install the stdout and file layers. The returned guard flushes the file
/// writer when dropped, so `main` keeps it alive for the whole run.
pub fn init_logger() -> WorkerGuard {
    let level = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_file =
        PathBuf::from(env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()));

    let (dir, name) = log_file_location(&log_file);
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, &name));

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .pretty()
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_ansi(true);

    // The review log is read long after the run, keep timestamps and no colors.
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging to {}", dir.join(&name).display());

    guard
}
