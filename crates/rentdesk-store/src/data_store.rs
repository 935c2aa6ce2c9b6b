//! Primary data store
//!
//! A single pretty-printed JSON document holding every entity collection,
//! read and written wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use rentdesk_common::{RentalError, Result};
use tracing::{debug, error};

use crate::fs::write_atomic;
use crate::model::DataSet;

/// Whole-document JSON store for the [`DataSet`]
#[derive(Debug, Clone)]
pub struct DataStore {
    path: PathBuf,
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the saved data set
    ///
    /// Returns an empty data set when the file is missing or fails to parse.
    pub fn load(&self) -> DataSet {
        if !self.exists() {
            debug!(path = %self.path.display(), "No data file yet, starting empty");
            return DataSet::default();
        }

        match fs::read_to_string(&self.path)
            .map_err(RentalError::from)
            .and_then(|content| {
                serde_json::from_str::<DataSet>(&content)
                    .map_err(|e| RentalError::InvalidFormat(e.to_string()))
            }) {
            Ok(data) => data,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to load data file");
                DataSet::default()
            }
        }
    }

    /// Overwrite the data file with the given data set
    pub fn save(&self, data: &DataSet) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| RentalError::IoError(format!("failed to serialize data: {}", e)))?;
        write_atomic(&self.path, &json).map_err(|e| {
            RentalError::IoError(format!(
                "failed to write {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Load, apply `f`, and persist the whole data set when `f` succeeds
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut DataSet) -> Result<T>,
    {
        let mut data = self.load();
        let value = f(&mut data)?;
        self.save(&data)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Property, Tenant};
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path().join("data.json"));
        assert!(!store.exists());
        assert_eq!(store.load(), DataSet::default());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();

        let store = DataStore::new(&path);
        assert!(store.exists());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path().join("data.json"));

        let mut data = DataSet::default();
        data.properties.push(
            Property::new("p1")
                .with("address", "12 Rothschild Blvd")
                .with("property_type", "apartment"),
        );
        data.tenants.push(Tenant::new("t1").with("name", "Noa").with("is_active", true));

        store.save(&data).unwrap();
        assert_eq!(store.load(), data);

        // Pretty-printed with all five collections
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  \"payments\": []"));
    }

    #[test]
    fn test_update_persists() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path().join("data.json"));

        let count = store
            .update(|data| {
                data.tenants.push(Tenant::new("t1"));
                Ok(data.tenants.len())
            })
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(store.load().tenants.len(), 1);
    }

    #[test]
    fn test_update_error_does_not_save() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path().join("data.json"));

        let result: Result<()> =
            store.update(|_| Err(RentalError::NotFound("tenant".to_string())));

        assert!(result.is_err());
        assert!(!store.exists());
    }
}
