//! User-initiated backup and restore
//!
//! Backup packages the data set and the document store into one archive.
//! Restore validates an archive, swaps the archived documents into the
//! store, and hands the data set back to the caller to persist.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::Local;
use rentdesk_common::{FileDialog, RentalError, Result};
use rentdesk_store::fs::temp_path_for;
use rentdesk_store::{DataSet, DocumentStore};
use tracing::{error, info, warn};

use crate::archive::{BackupArchive, write_backup_archive};

/// Default file name offered by the save dialog
pub fn default_backup_name() -> String {
    format!("rent-manager-backup-{}.zip", Local::now().format("%Y-%m-%d"))
}

/// Ask for a destination and write a backup archive there
pub fn backup(
    data: &DataSet,
    documents: &DocumentStore,
    dialog: &dyn FileDialog,
) -> Result<PathBuf> {
    let path = dialog
        .save_path("Save Data Backup", &default_backup_name())
        .ok_or_else(|| RentalError::UserCanceled("Backup".to_string()))?;
    backup_to(&path, data, documents)?;
    Ok(path)
}

/// Write a backup archive to `path`
///
/// The archive is assembled in a sibling temp file and renamed into place.
pub fn backup_to(path: &Path, data: &DataSet, documents: &DocumentStore) -> Result<()> {
    let tmp = temp_path_for(path);
    let result = (|| -> Result<()> {
        let file = fs::File::create(&tmp)?;
        let writer = write_backup_archive(BufWriter::new(file), data, documents)?;
        let file = writer
            .into_inner()
            .map_err(|e| RentalError::IoError(e.error().to_string()))?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            info!(path = %path.display(), "Backup archive written");
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            error!(path = %path.display(), error = %e, "Failed to write backup archive");
            Err(e)
        }
    }
}

/// Ask for a backup archive and restore from it
pub fn restore(documents: &DocumentStore, dialog: &dyn FileDialog) -> Result<DataSet> {
    let path = dialog
        .open_path("Restore from Backup", &["zip"])
        .ok_or_else(|| RentalError::UserCanceled("Restore".to_string()))?;
    restore_from(&path, documents)
}

/// Restore documents from the archive at `path` and return its data set
///
/// Nothing is touched until `data.json` has been validated. Documents are
/// extracted into a staging directory that replaces the store only after
/// every entry was written; on failure the live store is left as it was.
/// The returned data set is not persisted here.
pub fn restore_from(path: &Path, documents: &DocumentStore) -> Result<DataSet> {
    let file = fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            RentalError::NotFound(format!("backup archive {}", path.display()))
        }
        _ => RentalError::from(e),
    })?;

    let mut archive = BackupArchive::open(BufReader::new(file))?;
    let data = archive.read_data()?;

    let staging = documents.staging_dir();
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }

    let restored = match archive
        .extract_documents(&staging)
        .and_then(|count| documents.replace_with(&staging).map(|_| count))
    {
        Ok(count) => count,
        Err(e) => {
            if staging.exists()
                && let Err(cleanup) = fs::remove_dir_all(&staging)
            {
                warn!(path = %staging.display(), error = %cleanup, "Failed to remove restore staging directory");
            }
            error!(path = %path.display(), error = %e, "Failed to restore documents");
            return Err(e);
        }
    };

    info!(
        path = %path.display(),
        documents = restored,
        tenants = data.tenants.len(),
        properties = data.properties.len(),
        "Restored backup archive"
    );
    Ok(data)
}
