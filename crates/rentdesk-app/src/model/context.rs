//! Application context
//!
//! Resolved paths, stores and host collaborators, built once at startup and
//! passed to every operation handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rentdesk_backup::BackupSweeper;
use rentdesk_common::{
    BACKUPS_DIR_NAME, DATA_FILE_NAME, DOCUMENTS_DIR_NAME, Result, SETTINGS_FILE_NAME,
    SystemShell,
};
use rentdesk_contract::ContractOptions;
use rentdesk_store::{DataStore, DocumentStore, SettingsStore};
use tracing::info;

use super::config::Configuration;
use crate::startup::{CloseCoordinator, SaveListener};

/// State shared by all operation handlers
pub struct AppContext {
    pub configuration: Configuration,
    data_dir: PathBuf,
    data_store: DataStore,
    settings_store: SettingsStore,
    documents: DocumentStore,
    sweeper: BackupSweeper,
    shell: Arc<dyn SystemShell>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("configuration", &self.configuration)
            .field("data_dir", &self.data_dir)
            .field("shell", &"<dyn SystemShell>")
            .finish()
    }
}

impl AppContext {
    /// Resolve paths under the configured data directory and create the
    /// document and backup directories.
    pub fn new(configuration: Configuration, shell: Arc<dyn SystemShell>) -> Result<Self> {
        let data_dir = configuration.data_dir();
        Self::with_data_dir(configuration, data_dir, shell)
    }

    pub fn with_data_dir(
        configuration: Configuration,
        data_dir: PathBuf,
        shell: Arc<dyn SystemShell>,
    ) -> Result<Self> {
        let documents = DocumentStore::new(data_dir.join(DOCUMENTS_DIR_NAME));
        documents.ensure()?;
        let backups_dir = data_dir.join(BACKUPS_DIR_NAME);
        std::fs::create_dir_all(&backups_dir)?;

        let data_file = data_dir.join(DATA_FILE_NAME);
        let sweeper = BackupSweeper::new(&data_file, backups_dir)
            .with_retention_days(configuration.backup_retention_days());

        info!(data_dir = %data_dir.display(), "Application context ready");

        Ok(Self {
            data_store: DataStore::new(data_file),
            settings_store: SettingsStore::new(data_dir.join(SETTINGS_FILE_NAME)),
            documents,
            sweeper,
            shell,
            data_dir,
            configuration,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn data_store(&self) -> &DataStore {
        &self.data_store
    }

    pub fn settings_store(&self) -> &SettingsStore {
        &self.settings_store
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn sweeper(&self) -> &BackupSweeper {
        &self.sweeper
    }

    pub fn shell(&self) -> &dyn SystemShell {
        self.shell.as_ref()
    }

    pub fn contract_options(&self) -> ContractOptions {
        self.configuration.contract_options()
    }

    /// Close handshake bounded by the configured save timeout
    pub fn close_coordinator(&self) -> (CloseCoordinator, SaveListener) {
        CloseCoordinator::new(self.configuration.save_timeout())
    }
}
