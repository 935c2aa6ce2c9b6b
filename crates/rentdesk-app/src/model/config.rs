//! Configuration management for RentDesk
//!
//! Sources, lowest precedence first: `conf/rentdesk.yml` (or the file given
//! with `--config`), `RENTDESK__*` environment variables, then command line
//! overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{Config, Environment};
use rentdesk_backup::DEFAULT_RETENTION_DAYS;
use rentdesk_common::{DEFAULT_DATE_FORMAT, is_valid_date_format};
use rentdesk_contract::ContractOptions;
use tracing::warn;

use crate::startup::{DEFAULT_SAVE_TIMEOUT, LoggingConfig};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "conf/rentdesk.yml";

pub const DATA_DIR_PROPERTY: &str = "app.data_dir";
pub const BACKUP_RETENTION_DAYS_PROPERTY: &str = "backup.retention_days";
pub const SAVE_TIMEOUT_MS_PROPERTY: &str = "shutdown.save_timeout_ms";
pub const CONTRACT_DATE_FORMAT_PROPERTY: &str = "contract.date_format";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "rentdesk", version, about = "Rental property records, backups and contracts")]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config", env = "RENTDESK_CONFIG")]
    pub config: Option<PathBuf>,
    /// Data directory holding data.json, settings.json, documents and backups
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the daily backup sweep
    Sweep,
    /// Write a backup archive of the data and documents
    Backup {
        /// Destination archive; defaults to rent-manager-backup-<date>.zip
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore data and documents from a backup archive
    Restore { archive: PathBuf },
    /// Copy a file into the document store
    Upload { file: PathBuf },
    /// Open a stored document in the default viewer
    Open { file_id: String },
    /// Designate a stored document as a tenant's contract template
    Designate {
        tenant_id: String,
        document_id: String,
    },
    /// Generate a tenant's contract from its template
    Generate {
        tenant_id: String,
        /// Destination file; defaults to contract-<tenant name>.docx
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show lease-expiry notifications
    Notify,
    /// Print settings, or update them with KEY=VALUE pairs
    Settings {
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Print the host color scheme
    Theme,
    /// Reveal the data file in the file manager
    DataFolder,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        Self::load(cli.config.as_deref(), cli.data_dir.as_deref())
    }

    pub fn load(config_file: Option<&Path>, data_dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        builder = match config_file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix("RENTDESK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(dir) = data_dir {
            builder = builder
                .set_override(DATA_DIR_PROPERTY, dir.to_string_lossy().into_owned())
                .context("Failed to set data directory override")?;
        }

        let config = builder
            .build()
            .context("Failed to build configuration")?;
        Ok(Configuration { config })
    }

    // ========================================================================
    // Application
    // ========================================================================

    pub fn data_dir(&self) -> PathBuf {
        self.config
            .get_string(DATA_DIR_PROPERTY)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".rentdesk")
            })
    }

    // ========================================================================
    // Backup
    // ========================================================================

    pub fn backup_retention_days(&self) -> u64 {
        self.config
            .get_int(BACKUP_RETENTION_DAYS_PROPERTY)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_RETENTION_DAYS)
    }

    // ========================================================================
    // Shutdown
    // ========================================================================

    pub fn save_timeout(&self) -> Duration {
        self.config
            .get_int(SAVE_TIMEOUT_MS_PROPERTY)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SAVE_TIMEOUT)
    }

    // ========================================================================
    // Contract
    // ========================================================================

    /// Falls back to the default when the configured pattern cannot render
    pub fn contract_date_format(&self) -> String {
        match self.config.get_string(CONTRACT_DATE_FORMAT_PROPERTY) {
            Ok(format) if is_valid_date_format(&format) => format,
            Ok(format) => {
                warn!(format = %format, "Invalid contract date format, using default");
                DEFAULT_DATE_FORMAT.to_string()
            }
            Err(_) => DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn contract_options(&self) -> ContractOptions {
        ContractOptions {
            date_format: self.contract_date_format(),
        }
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            &self.data_dir(),
            self.config.get_string("logging.dir").ok(),
            self.config.get_bool("logging.console").unwrap_or(true),
            self.config.get_bool("logging.file").unwrap_or(true),
            self.config.get_string("logging.level").ok(),
        )
        .with_env_overrides()
    }
}
