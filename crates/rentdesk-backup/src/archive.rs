// Backup archive format
// A deflate zip holding `data.json` plus one `documents/<name>` entry per stored document

use std::fs;
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use rentdesk_common::{RentalError, Result};
use rentdesk_store::{DataSet, DocumentStore};
use serde_json::Value;
use tracing::{debug, warn};
use zip::{ZipArchive, ZipWriter, result::ZipError, write::SimpleFileOptions};

/// Archive entry holding the serialized data set
pub const DATA_ENTRY: &str = "data.json";

/// Entry prefix for document store files
pub const DOCUMENTS_PREFIX: &str = "documents/";

/// Collections a backup must contain to be accepted
const REQUIRED_COLLECTIONS: [&str; 2] = ["properties", "tenants"];

pub(crate) fn zip_error(e: ZipError) -> RentalError {
    match e {
        ZipError::Io(io) => RentalError::IoError(io.to_string()),
        ZipError::FileNotFound => RentalError::InvalidFormat("archive entry not found".to_string()),
        other => RentalError::InvalidFormat(other.to_string()),
    }
}

/// Write a backup archive of `data` and every file in `documents`
pub fn write_backup_archive<W: Write + Seek>(
    writer: W,
    data: &DataSet,
    documents: &DocumentStore,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let json = serde_json::to_vec_pretty(data)
        .map_err(|e| RentalError::IoError(format!("failed to serialize data: {}", e)))?;
    zip.start_file(DATA_ENTRY, options).map_err(zip_error)?;
    zip.write_all(&json)?;

    for name in documents.list()? {
        let mut source = fs::File::open(documents.root().join(&name))?;
        zip.start_file(format!("{}{}", DOCUMENTS_PREFIX, name), options)
            .map_err(zip_error)?;
        io::copy(&mut source, &mut zip)?;
        debug!(document = %name, "Added document to backup");
    }

    zip.finish().map_err(zip_error)
}

/// Validate the structure of a backup's data entry and deserialize it
pub fn parse_backup_data(raw: &str) -> Result<DataSet> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| RentalError::InvalidFormat(format!("data.json is not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| RentalError::InvalidFormat("data.json is not an object".to_string()))?;
    for key in REQUIRED_COLLECTIONS {
        if object.get(key).is_none_or(Value::is_null) {
            return Err(RentalError::InvalidFormat(format!(
                "backup is missing the '{}' collection",
                key
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| RentalError::InvalidFormat(e.to_string()))
}

/// Document entry name reduced to a plain file name, if it is one
fn document_file_name(entry_name: &str) -> Option<&str> {
    let name = entry_name.strip_prefix(DOCUMENTS_PREFIX)?;
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\');
    plain.then_some(name)
}

/// Read side of a backup archive
pub struct BackupArchive<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> BackupArchive<R> {
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(|e| match e {
            ZipError::Io(io) => RentalError::IoError(io.to_string()),
            other => RentalError::InvalidFormat(format!("not a backup archive: {}", other)),
        })?;
        Ok(Self { archive })
    }

    /// Read and validate the `data.json` entry
    pub fn read_data(&mut self) -> Result<DataSet> {
        let mut entry = self.archive.by_name(DATA_ENTRY).map_err(|e| match e {
            ZipError::FileNotFound => {
                RentalError::InvalidFormat(format!("backup archive has no {}", DATA_ENTRY))
            }
            other => zip_error(other),
        })?;

        let mut raw = String::new();
        entry
            .read_to_string(&mut raw)
            .map_err(|e| RentalError::InvalidFormat(format!("unreadable {}: {}", DATA_ENTRY, e)))?;
        parse_backup_data(&raw)
    }

    /// Extract every document entry into `dest`, returning how many were written
    pub fn extract_documents(&mut self, dest: &Path) -> Result<usize> {
        fs::create_dir_all(dest)?;

        let mut written = 0;
        for i in 0..self.archive.len() {
            let mut entry = self.archive.by_index(i).map_err(zip_error)?;
            if entry.is_dir() {
                continue;
            }

            let entry_name = entry.name().to_string();
            if !entry_name.starts_with(DOCUMENTS_PREFIX) {
                continue;
            }
            let Some(name) = document_file_name(&entry_name) else {
                warn!(entry = %entry_name, "Skipping document entry with a nested or unsafe name");
                continue;
            };

            let mut out = fs::File::create(dest.join(name))?;
            io::copy(&mut entry, &mut out)?;
            written += 1;
        }
        Ok(written)
    }
}
