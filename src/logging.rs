//! Logging setup for the frame pacer driver.
//!
//! Every event is written as one JSON object per line to two sinks:
//!
//! - stderr, for whoever launched the demo;
//! - `<local data dir>/frame-pacer/pacer.<YYYY-MM-DD>.log`, rotated at UTC
//!   midnight with the three newest files kept. File records also carry
//!   the source location and thread name.
//!
//! The engine logs each frame decision at `debug` and only mode switches and
//! input changes at `info`. The demo's own tick and stats lines are `info`.

use crate::error::LoggingError;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log directory name under the local data dir
const LOG_DIR: &str = "frame-pacer";
/// Log file prefix
const LOG_FILE_PREFIX: &str = "pacer";
/// Maximum number of log files to retain
const MAX_LOG_FILES: usize = 3;

/// Install the global subscriber. Set `RUST_LOG=frame_pacer=debug` to see
/// every frame decision.
///
/// Fails if the data directory cannot be resolved or created.
pub fn init_logging() -> Result<LogGuard, LoggingError> {
    let file_appender = file_appender(&log_directory()?)?;

    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);
    let (non_blocking_stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .json()
        .with_timer(UtcTime::new(Rfc3339))
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(non_blocking_file);

    let stderr_layer = fmt::layer()
        .json()
        .with_timer(UtcTime::new(Rfc3339))
        .with_current_span(true)
        .with_writer(non_blocking_stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LogGuard {
        _file_guard: file_guard,
        _stderr_guard: stderr_guard,
    })
}

/// Rolling appender writing `pacer.<date>.log` into `log_dir`, creating it first.
fn file_appender(log_dir: &Path) -> Result<RollingFileAppender, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|e| LoggingError::DirectoryCreationFailed {
        path: log_dir.display().to_string(),
        source: e,
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| LoggingError::AppenderCreationFailed(e.to_string()))
}

/// `frame-pacer/` under the platform's local data dir.
pub fn log_directory() -> Result<PathBuf, LoggingError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(LOG_DIR))
        .ok_or(LoggingError::DataDirectoryNotFound)
}

/// Flushes both sinks on drop. Bind it in `main` so buffered records are
/// written before exit.
pub struct LogGuard {
    _file_guard: tracing_appender::non_blocking::WorkerGuard,
    _stderr_guard: tracing_appender::non_blocking::WorkerGuard,
}
