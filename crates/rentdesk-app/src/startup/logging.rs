//! Console and rolling file logging.
//!
//! Every event goes to the console (human-readable, with colors) and to
//! `rentdesk.log` in the log directory, rotated daily.
//!
//! Log files are stored in `<data dir>/logs` by default.
//! Override with `RENTDESK_LOG_DIR` environment variable or `logging.dir` config.

use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Root log file name
pub const LOG_FILE_NAME: &str = "rentdesk.log";

/// Logging configuration for the entire application.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base log directory
    pub log_dir: PathBuf,
    /// Enable console output
    pub console_output: bool,
    /// Enable file logging
    pub file_logging: bool,
    /// Default level for every layer when `RUST_LOG` is unset
    pub level: Level,
}

impl LoggingConfig {
    /// Defaults rooted at the application data directory.
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self {
            log_dir: data_dir.join("logs"),
            console_output: true,
            file_logging: true,
            level: Level::INFO,
        }
    }

    /// Create from application configuration.
    pub fn from_config(
        data_dir: &Path,
        log_dir: Option<String>,
        console_output: bool,
        file_logging: bool,
        level: Option<String>,
    ) -> Self {
        let defaults = Self::for_data_dir(data_dir);
        Self {
            log_dir: log_dir.map(PathBuf::from).unwrap_or(defaults.log_dir),
            console_output,
            file_logging,
            level: level
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.level),
        }
    }

    /// Apply `RENTDESK_LOG_DIR` and `RENTDESK_LOG_LEVEL` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("RENTDESK_LOG_DIR")
            && !dir.is_empty()
        {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(level) = std::env::var("RENTDESK_LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.level = level;
        }
        self
    }
}

/// Guard that keeps the logging system alive.
///
/// Must be kept alive for the duration of the application. When dropped,
/// all buffered log output is flushed.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Initialize console and file logging.
///
/// `RUST_LOG` takes precedence over the configured level for both layers.
///
/// # Returns
///
/// A [`LoggingGuard`] that must be kept alive for the duration of the application.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(env_filter(config.level));
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(env_filter(config.level));
        layers.push(Box::new(file_layer));
    }

    // All filtering is per-layer
    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(log_dir = %config.log_dir.display(), "File logging initialized");
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
