//! Run logs for the command-line driver.
//!
//! Each invocation gets its own log file named after the start time and the
//! dataset being fitted, e.g. `20231114T221320_train.log`. Because the
//! timestamp leads, file names sort chronologically and retention only has
//! to compare names. Console output goes to stderr so stdout carries only
//! the fit report.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, fmt::time::UtcTime, prelude::*};

use crate::app_dirs::{AppDirError, AppDirs};

/// Number of run logs kept in the log directory, the current one included.
pub const MAX_LOG_FILES: usize = 10;
const LOG_EXTENSION: &str = "log";
const FALLBACK_RUN_LABEL: &str = "run";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The application log directory could not be resolved or created.
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    /// Listing or deleting old run logs failed.
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    /// The start time could not be rendered into a file name.
    #[error("Failed to format run log name: {0}")]
    Timestamp(#[from] time::error::Format),
    /// The file appender could not open the run log.
    #[error("Failed to open run log: {0}")]
    Appender(#[from] InitError),
    /// Another global subscriber is already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Start logging for a run labelled `run_label` in the application log
/// directory and return the run log path.
///
/// Calling it again after a successful start does nothing and returns `None`.
pub fn init(run_label: &str) -> Result<Option<PathBuf>, LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }
    let log_dir = AppDirs::resolve()?.logs_dir()?;
    init_in(&log_dir, run_label)
}

/// Like [`init`], writing the run log into `log_dir`.
pub fn init_in(log_dir: &Path, run_label: &str) -> Result<Option<PathBuf>, LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }
    let stem = run_log_stem(OffsetDateTime::now_utc(), run_label)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&stem)
        .filename_suffix(LOG_EXTENSION)
        .build(log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let removed = retain_recent_runs(log_dir, MAX_LOG_FILES)?;

    const TIME_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(UtcTime::new(TIME_FORMAT))
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(UtcTime::new(TIME_FORMAT))
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    let path = log_dir.join(format!("{stem}.{LOG_EXTENSION}"));
    tracing::debug!(removed, "Run log at {}", path.display());
    Ok(Some(path))
}

/// `<UTC start>_<label>`, with the label reduced to characters that are safe
/// in file names on every platform.
fn run_log_stem(started: OffsetDateTime, run_label: &str) -> Result<String, LoggingError> {
    const STAMP: &[FormatItem<'static>] =
        format_description!("[year][month][day]T[hour][minute][second]");
    let label: String = run_label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let label = if label.is_empty() {
        FALLBACK_RUN_LABEL
    } else {
        label.as_str()
    };
    Ok(format!("{}_{label}", started.format(STAMP)?))
}

/// Delete the oldest run logs so that at most `keep` remain. Returns how many
/// were removed.
fn retain_recent_runs(dir: &Path, keep: usize) -> Result<usize, LoggingError> {
    let listing = fs::read_dir(dir).map_err(|source| LoggingError::Io {
        action: "list",
        path: dir.to_path_buf(),
        source,
    })?;
    let mut runs: Vec<PathBuf> = listing
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == LOG_EXTENSION))
        .collect();
    runs.sort();
    let stale = runs.len().saturating_sub(keep);
    for path in &runs[..stale] {
        fs::remove_file(path).map_err(|source| LoggingError::Io {
            action: "remove",
            path: path.clone(),
            source,
        })?;
    }
    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn stem_leads_with_utc_start_time() {
        let started = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(
            run_log_stem(started, "train").unwrap(),
            "20231114T221320_train"
        );
    }

    #[test]
    fn stem_replaces_unsafe_label_characters() {
        let started = OffsetDateTime::from_unix_timestamp(0).unwrap();
        assert_eq!(
            run_log_stem(started, "heart data.v2").unwrap(),
            "19700101T000000_heart_data_v2"
        );
        assert_eq!(run_log_stem(started, "").unwrap(), "19700101T000000_run");
    }

    #[test]
    fn retention_drops_oldest_runs_by_name() {
        let dir = tempdir().unwrap();
        for stem in [
            "20240103T000000_b",
            "20240101T000000_a",
            "20240104T000000_a",
            "20240102T000000_c",
        ] {
            fs::write(dir.path().join(format!("{stem}.log")), "").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(retain_recent_runs(dir.path(), 2).unwrap(), 2);
        assert_eq!(
            names_in(dir.path()),
            vec!["20240103T000000_b.log", "20240104T000000_a.log", "notes.txt"]
        );
        assert_eq!(retain_recent_runs(dir.path(), 2).unwrap(), 0);
    }
}
