//! Console and rolling-file logging.
//!
//! `mpea.log` receives every event. Each component file only receives events
//! whose `tracing` target starts with one of its prefixes:
//!
//! | File              | Prefixes                                                   |
//! |-------------------|------------------------------------------------------------|
//! | `i18n.log`        | `mpea_i18n`, `mpea_server::api::translation`               |
//! | `auth.log`        | `mpea_auth`, `mpea_server::middleware`, `mpea_server::api::auth` |
//! | `persistence.log` | `mpea_persistence`, `mpea_migration`                       |
//!
//! Files go to `~/mpea/logs` unless `mpea.logs.path` or `MPEA_LOG_DIR` says
//! otherwise. `RUST_LOG` overrides the console and root file levels.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const ROOT_LOG_FILE: &str = "mpea.log";

/// `(file name, target prefixes)`
const COMPONENT_LOGS: &[(&str, &[&str])] = &[
    ("i18n.log", &["mpea_i18n", "mpea_server::api::translation"]),
    (
        "auth.log",
        &["mpea_auth", "mpea_server::middleware", "mpea_server::api::auth"],
    ),
    ("persistence.log", &["mpea_persistence", "mpea_migration"]),
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn default_log_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join("mpea")
        .join("logs")
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_level(name: &str) -> Option<Level> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: true,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Defaults overridden by `MPEA_LOG_DIR`, `MPEA_LOG_CONSOLE`,
    /// `MPEA_LOG_FILE`, `MPEA_LOG_LEVEL` and `MPEA_LOG_FILE_LEVEL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let console_level = env_level("MPEA_LOG_LEVEL").unwrap_or(defaults.console_level);

        Self {
            log_dir: std::env::var_os("MPEA_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            console_output: env_flag("MPEA_LOG_CONSOLE", defaults.console_output),
            console_level,
            file_logging: env_flag("MPEA_LOG_FILE", defaults.file_logging),
            file_level: env_level("MPEA_LOG_FILE_LEVEL").unwrap_or(console_level),
            rotation: defaults.rotation,
        }
    }

    /// Use `level` for the console and every file.
    pub fn with_level(mut self, level: Level) -> Self {
        self.console_level = level;
        self.file_level = level;
        self
    }

    fn rolling_writer(&self, file_name: &str, guards: &mut Vec<WorkerGuard>) -> NonBlocking {
        let appender = RollingFileAppender::new(self.rotation.into(), &self.log_dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        writer
    }
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Keeps the background file writers running; dropping it flushes them.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

fn build_layers(config: &LoggingConfig) -> std::io::Result<(Vec<BoxedLayer>, Vec<WorkerGuard>)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();

    if config.console_output {
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_filter(level_filter(config.console_level))
                .boxed(),
        );
    }

    if !config.file_logging {
        return Ok((layers, guards));
    }

    std::fs::create_dir_all(&config.log_dir)?;

    let root = config.rolling_writer(ROOT_LOG_FILE, &mut guards);
    layers.push(
        fmt::layer()
            .with_writer(root)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(level_filter(config.file_level))
            .boxed(),
    );

    for (file_name, prefixes) in COMPONENT_LOGS {
        let targets = prefixes
            .iter()
            .fold(Targets::new(), |targets, prefix| {
                targets.with_target(*prefix, config.file_level)
            });
        let writer = config.rolling_writer(file_name, &mut guards);
        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(targets)
                .boxed(),
        );
    }

    Ok((layers, guards))
}

/// Install the global subscriber. Keep the returned guard for the lifetime of
/// the process.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let (layers, guards) = build_layers(config)?;

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(log_dir = %config.log_dir.display(), "File logging initialized");
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.console_output);
        assert!(config.file_logging);
        assert_eq!(config.file_level, Level::INFO);
        assert!(config.log_dir.ends_with("mpea/logs"));
    }

    #[test]
    fn test_with_level() {
        let config = LoggingConfig::default().with_level(Level::DEBUG);
        assert_eq!(config.console_level, Level::DEBUG);
        assert_eq!(config.file_level, Level::DEBUG);
    }

    #[test]
    fn test_component_files_are_distinct() {
        let mut names: Vec<&str> = COMPONENT_LOGS.iter().map(|(name, _)| *name).collect();
        names.push(ROOT_LOG_FILE);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMPONENT_LOGS.len() + 1);
    }

    #[test]
    fn test_build_layers_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let config = LoggingConfig {
            log_dir: log_dir.clone(),
            console_output: false,
            rotation: LogRotation::Never,
            ..Default::default()
        };

        let (layers, guards) = build_layers(&config).unwrap();

        assert!(log_dir.is_dir());
        assert_eq!(layers.len(), 1 + COMPONENT_LOGS.len());
        assert_eq!(guards.len(), 1 + COMPONENT_LOGS.len());
    }

    #[test]
    fn test_build_layers_console_only() {
        let config = LoggingConfig {
            log_dir: PathBuf::from("/nonexistent/mpea/logs"),
            file_logging: false,
            ..Default::default()
        };

        let (layers, guards) = build_layers(&config).unwrap();

        assert_eq!(layers.len(), 1);
        assert!(guards.is_empty());
    }
}
