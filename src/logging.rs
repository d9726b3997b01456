//! Tracing setup.
//!
//! Events go to stderr (so `--format json` output on stdout stays clean)
//! and, when `[logging] enabled`, to a non-blocking file appender.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::config::expand_home;
use crate::config::schema::LoggingConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to prepare log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber.
///
/// Stderr only shows errors unless `RUST_LOG` is set; notifications are
/// already printed by the renderers. The file layer follows
/// `config.level`. If the log file cannot be prepared, stderr logging is
/// still installed and the failure is logged there.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the life of the process.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter());

    let (file, file_error) = if config.enabled {
        match prepare_log_file(&expand_home(&config.path)) {
            Ok(file) => (Some(file), None),
            Err(err) => (None, Some(err)),
        }
    } else {
        (None, None)
    };

    let (file_layer, guard) = match file {
        Some((dir, file_name)) => {
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(build_env_filter(&config.level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = Registry::default().with(stderr_layer).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(err) = file_error {
        tracing::error!("file logging disabled: {err}");
    }
    Ok(guard)
}

/// `RUST_LOG` wins over the configured level; an unparseable level falls
/// back to `warn`.
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn stderr_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
}

fn prepare_log_file(path: &Path) -> Result<(PathBuf, PathBuf), LoggingError> {
    let err = |source| LoggingError::LogFile {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(err)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(err)?;

    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("jarvis.log"));
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jarvis.log");
        let (parent, name) = prepare_log_file(&path).unwrap();
        assert!(path.exists());
        assert_eq!(parent, dir.path().join("nested"));
        assert_eq!(name, PathBuf::from("jarvis.log"));
    }

    #[test]
    fn unwritable_log_file_still_installs_stderr_logging() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        let config = LoggingConfig {
            enabled: true,
            path: blocker.join("jarvis.log").display().to_string(),
            level: "warn".to_string(),
        };

        let guard = init(&config).unwrap();
        assert!(guard.is_none());
        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn stderr_shows_errors_only_by_default() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(stderr_filter().to_string(), "error");
        }
    }

    #[test]
    fn bad_level_falls_back() {
        // Only checks that construction never panics.
        let _ = build_env_filter("not a [valid filter");
        let _ = build_env_filter("debug");
    }
}
