//! Logging setup: always to a file, never to the terminal the editor draws on.
//!
//! ## Environment Variables
//!
//! 1. **`TRACK_EDIT_LOG`** (highest priority) - editor-specific level or filter
//! 2. **`RUST_LOG`** - standard tracing filter
//! 3. **Default** - `warn` globally, `info` for this crate
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/track-edit/logs/track-edit-<pid>.log`.
//! Override with `--log-file <path>`; a path without an extension is taken
//! as a directory.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type LogError = Box<dyn std::error::Error + Send + Sync>;

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Install the file subscriber.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program;
/// dropping it flushes and stops the background writer.
pub fn init(log_file_path: Option<PathBuf>) -> Result<LogGuard, LogError> {
    let (log_dir, filename) = resolve_log_path(log_file_path);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_filter());

    Registry::default().with(file_layer).try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("track-edit-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("track-edit")
        .join("logs");

    (dir, filename)
}

/// Implements the priority system: `TRACK_EDIT_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> EnvFilter {
    if let Ok(level) = env::var("TRACK_EDIT_LOG") {
        return expand_track_edit_log(&level);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new("warn,track_edit=info")
}

/// `TRACK_EDIT_LOG=debug` becomes `warn,track_edit=debug`; anything with
/// filter syntax is used as-is.
fn expand_track_edit_log(value: &str) -> EnvFilter {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return EnvFilter::new(value);
    }
    EnvFilter::new(format!("warn,track_edit={value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_with_file_name() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs/edit.log")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert_eq!(name, "edit.log");
    }

    #[test]
    fn test_log_path_directory_gets_pid_file() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert_eq!(name, format!("track-edit-{}.log", std::process::id()));
    }

    #[test]
    fn test_default_log_path() {
        let (dir, _) = resolve_log_path(None);
        assert!(dir.ends_with("track-edit/logs"));
    }
}
