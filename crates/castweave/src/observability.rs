//! Logging and tracing setup.
//!
//! Two layers share one registry: a compact human-readable layer on stderr,
//! and an optional JSONL file layer written through a non-blocking
//! `tracing-appender` worker. Stdout stays free for command output and the
//! MCP transport.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Explicit log file path.
const LOG_PATH_ENV: &str = "CASTWEAVE_LOG_PATH";
/// Log directory; the file inside it is [`LOG_FILE_NAME`].
const LOG_DIR_ENV: &str = "CASTWEAVE_LOG_DIR";
const LOG_FILE_NAME: &str = "castweave.jsonl";

/// Where, if anywhere, JSONL logs are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file, from `CASTWEAVE_LOG_PATH`.
    pub log_path: Option<PathBuf>,
    /// Log directory, from `CASTWEAVE_LOG_DIR` or the config file.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to `config_log_dir` for the directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let non_empty = |key: &str| {
            std::env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            log_path: non_empty(LOG_PATH_ENV),
            log_dir: non_empty(LOG_DIR_ENV).or(config_log_dir),
        }
    }

    /// Directory and file name of the JSONL log, if file logging is on.
    fn log_file(&self) -> Option<(PathBuf, PathBuf)> {
        if let Some(path) = &self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name()?;
            return Some((dir.to_path_buf(), PathBuf::from(name)));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), PathBuf::from(LOG_FILE_NAME)))
    }
}

/// Build a filter: `RUST_LOG` wins, then `-q`/`-v`, then `default_level`.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => default_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_observability(
    config: &ObservabilityConfig,
    console_filter: EnvFilter,
    file_filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(console_filter);

    let (file_layer, guard) = match config.log_file() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(file_filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_without_a_location() {
        assert!(ObservabilityConfig::default().log_file().is_none());
    }

    #[test]
    fn log_dir_uses_default_file_name() {
        let config = ObservabilityConfig {
            log_path: None,
            log_dir: Some(PathBuf::from("/var/log/castweave")),
        };
        let (dir, name) = config.log_file().unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/castweave"));
        assert_eq!(name, PathBuf::from(LOG_FILE_NAME));
    }

    #[test]
    fn explicit_path_wins_over_dir() {
        let config = ObservabilityConfig {
            log_path: Some(PathBuf::from("/tmp/run/trace.jsonl")),
            log_dir: Some(PathBuf::from("/var/log/castweave")),
        };
        let (dir, name) = config.log_file().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/run"));
        assert_eq!(name, PathBuf::from("trace.jsonl"));
    }

    #[test]
    fn bare_file_name_logs_to_cwd() {
        let config = ObservabilityConfig {
            log_path: Some(PathBuf::from("trace.jsonl")),
            log_dir: None,
        };
        let (dir, _) = config.log_file().unwrap();
        assert_eq!(dir, PathBuf::from("."));
    }
}
