//! Document store
//!
//! Flat directory of uploaded attachments and contract templates. Files are
//! named by a generated v4 UUID plus the original extension so the host
//! viewer still recognises them.

use std::fs;
use std::path::{Path, PathBuf};

use rentdesk_common::{RentalError, Result, SystemShell, is_valid_file_id};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Result of copying a file into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub file_id: String,
    pub original_name: String,
}

/// Exclusive owner of document bytes
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if needed
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Copy an externally selected file into the store under a new id
    pub fn store(&self, source: &Path) -> Result<StoredDocument> {
        if !source.is_file() {
            return Err(RentalError::NotFound(format!(
                "source file {}",
                source.display()
            )));
        }

        let original_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let file_id = format!("{}{}", uuid::Uuid::new_v4(), extension);

        self.ensure()?;
        fs::copy(source, self.root.join(&file_id)).map_err(|e| {
            error!(source = %source.display(), error = %e, "Failed to store document");
            RentalError::IoError(format!("failed to copy {}: {}", source.display(), e))
        })?;

        info!(file_id = %file_id, original_name = %original_name, "Stored document");
        Ok(StoredDocument {
            file_id,
            original_name,
        })
    }

    /// Resolve a document id to its file
    pub fn path_of(&self, file_id: &str) -> Result<PathBuf> {
        if !is_valid_file_id(file_id) {
            return Err(RentalError::NotFound(format!("document '{}'", file_id)));
        }
        let path = self.root.join(file_id);
        if !path.is_file() {
            return Err(RentalError::NotFound(format!("document '{}'", file_id)));
        }
        Ok(path)
    }

    pub fn read(&self, file_id: &str) -> Result<Vec<u8>> {
        let path = self.path_of(file_id)?;
        Ok(fs::read(path)?)
    }

    /// Hand a stored document to the host's default viewer
    pub fn open(&self, file_id: &str, shell: &dyn SystemShell) -> Result<()> {
        let path = self.path_of(file_id)?;
        shell.open_path(&path).map_err(|e| {
            error!(file_id = %file_id, error = %e, "Failed to open document");
            RentalError::IoError(format!("failed to open document: {}", e))
        })
    }

    /// Sorted names of every stored document
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete every stored document, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let names = self.list()?;
        for name in &names {
            fs::remove_file(self.root.join(name))?;
        }
        info!(removed = names.len(), "Cleared document store");
        Ok(names.len())
    }

    /// Directory next to the store used to stage a replacement set
    pub fn staging_dir(&self) -> PathBuf {
        self.sibling("restore-staging")
    }

    /// Swap a fully populated staging directory into place
    ///
    /// The previous contents are moved aside first and deleted only after
    /// the staged directory has been renamed over the store.
    pub fn replace_with(&self, staging: &Path) -> Result<()> {
        let retired = self.sibling("retired");
        if retired.exists() {
            fs::remove_dir_all(&retired)?;
        }

        let had_previous = self.root.exists();
        if had_previous {
            fs::rename(&self.root, &retired)?;
        }

        if let Err(e) = fs::rename(staging, &self.root) {
            if had_previous && let Err(restore_err) = fs::rename(&retired, &self.root) {
                error!(error = %restore_err, "Failed to put previous documents back");
            }
            return Err(RentalError::IoError(format!(
                "failed to swap in restored documents: {}",
                e
            )));
        }

        if had_previous && let Err(e) = fs::remove_dir_all(&retired) {
            warn!(path = %retired.display(), error = %e, "Failed to remove retired documents");
        }
        Ok(())
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "documents".to_string());
        self.root.with_file_name(format!("{}.{}", name, suffix))
    }
}
