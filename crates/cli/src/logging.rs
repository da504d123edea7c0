//! Tracing setup for `mdexp`.
//!
//! Logs always go to stderr so stdout stays clean for reports and JSON. An
//! optional log file gets its own level.

use mdexport_core::config::LoggingConfig;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

static FILE_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Install the global subscriber. `verbose` lifts stderr to at least `debug`.
pub fn init(cfg: &LoggingConfig, verbose: bool) {
    let stderr_level = stderr_level(&cfg.level, verbose);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(env_filter(stderr_level));

    let (file_layer, file_error) = match cfg.file.as_deref() {
        Some(path) => match open_log_file(path) {
            Ok(file) => {
                let level = cfg
                    .file_level
                    .as_deref()
                    .and_then(parse_level)
                    .unwrap_or(LevelFilter::DEBUG);
                let (writer, guard) = tracing_appender::non_blocking(file);
                if let Ok(mut slot) = FILE_GUARD.lock() {
                    *slot = Some(guard);
                }
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(env_filter(level));
                (Some(layer), None)
            }
            Err(e) => (None, Some((path.to_path_buf(), e))),
        },
        None => (None, None),
    };

    tracing_subscriber::registry().with(stderr_layer).with(file_layer).init();

    if let Some((path, e)) = file_error {
        tracing::warn!(path = %path.display(), error = %e, "log file unavailable, logging to stderr only");
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

fn stderr_level(configured: &str, verbose: bool) -> LevelFilter {
    let level = parse_level(configured).unwrap_or(LevelFilter::INFO);
    if verbose { level.max(LevelFilter::DEBUG) } else { level }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}
