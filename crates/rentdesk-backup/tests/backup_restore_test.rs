// Integration tests for the backup/restore pipeline
// Tests archive round-trips through the dialog-driven entry points

use std::fs;
use std::io::Write;

use proptest::prelude::*;
use rentdesk_backup::{backup, restore, restore_from};
use rentdesk_common::{PresetDialog, RentalError};
use rentdesk_store::{DataSet, DocumentStore, LedgerRecord, Property, Tenant};
use serde_json::Value;
use tempfile::TempDir;
use zip::{ZipWriter, write::SimpleFileOptions};

const PRESENTATION_DATA: &str =
    include_str!("../../rentdesk-store/tests/fixtures/presentation_data.json");

fn sample_data() -> DataSet {
    DataSet {
        properties: vec![
            Property::new("p-1")
                .with("address", "4 Ben Yehuda St, Haifa")
                .with("property_type", "apartment")
                .with("notes", "ground floor"),
        ],
        tenants: vec![
            Tenant::new("t-1")
                .with("name", "Yael Cohen")
                .with("property_id", "p-1")
                .with("monthly_rent", 4200.0)
                .with("deposit", 8400.0)
                .with("rent_due_day", 1)
                .with("contract_start_date", "2026-01-01")
                .with("contract_end_date", "2026-12-31")
                .with("is_active", true)
                .with("contract_template_id", "tpl.docx"),
        ],
        payments: vec![LedgerRecord::new(1_i64).with("tenant_id", "t-1")],
        ..Default::default()
    }
}

fn document_store(dir: &TempDir, name: &str) -> DocumentStore {
    let store = DocumentStore::new(dir.path().join(name));
    store.ensure().unwrap();
    store
}

#[test]
fn test_backup_then_restore_round_trip() {
    let dir = TempDir::new().unwrap();
    let documents = document_store(&dir, "documents");
    fs::write(documents.root().join("tpl.docx"), b"PK\x03\x04template").unwrap();
    fs::write(documents.root().join("scan.pdf"), vec![0u8, 255, 7, 42]).unwrap();

    let data = sample_data();
    let archive_path = dir.path().join("backup.zip");
    let written = backup(&data, &documents, &PresetDialog::saving_to(&archive_path)).unwrap();
    assert_eq!(written, archive_path);

    // Restore into a store that currently holds something else
    documents.clear().unwrap();
    fs::write(documents.root().join("stale.txt"), b"stale").unwrap();

    let restored = restore(&documents, &PresetDialog::opening(&archive_path)).unwrap();

    assert_eq!(restored, data);
    assert_eq!(
        documents.list().unwrap(),
        vec!["scan.pdf".to_string(), "tpl.docx".to_string()]
    );
    assert_eq!(
        fs::read(documents.root().join("scan.pdf")).unwrap(),
        vec![0u8, 255, 7, 42]
    );
    assert_eq!(
        fs::read(documents.root().join("tpl.docx")).unwrap(),
        b"PK\x03\x04template"
    );
}

#[test]
fn test_restore_does_not_touch_data_store_file() {
    let dir = TempDir::new().unwrap();
    let documents = document_store(&dir, "documents");
    let archive_path = dir.path().join("backup.zip");
    backup(&sample_data(), &documents, &PresetDialog::saving_to(&archive_path)).unwrap();

    let data_file = dir.path().join("data.json");
    fs::write(&data_file, "live").unwrap();

    restore_from(&archive_path, &documents).unwrap();
    assert_eq!(fs::read_to_string(&data_file).unwrap(), "live");
}

#[test]
fn test_restore_without_data_entry_is_invalid_and_keeps_documents() {
    let dir = TempDir::new().unwrap();
    let documents = document_store(&dir, "documents");
    fs::write(documents.root().join("keep.pdf"), b"keep").unwrap();

    let archive_path = dir.path().join("docs-only.zip");
    let mut zip = ZipWriter::new(fs::File::create(&archive_path).unwrap());
    zip.start_file("documents/other.pdf", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"other").unwrap();
    zip.finish().unwrap();

    let result = restore_from(&archive_path, &documents);

    assert!(matches!(result, Err(RentalError::InvalidFormat(_))));
    assert_eq!(documents.list().unwrap(), vec!["keep.pdf".to_string()]);
}

#[test]
fn test_restore_rejects_data_without_required_collections() {
    let dir = TempDir::new().unwrap();
    let documents = document_store(&dir, "documents");

    let archive_path = dir.path().join("partial.zip");
    let mut zip = ZipWriter::new(fs::File::create(&archive_path).unwrap());
    zip.start_file("data.json", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(br#"{"properties":[],"events":[]}"#).unwrap();
    zip.finish().unwrap();

    let result = restore_from(&archive_path, &documents);
    assert!(matches!(result, Err(RentalError::InvalidFormat(_))));
}

#[test]
fn test_restore_plain_json_file_is_invalid() {
    let dir = TempDir::new().unwrap();
    let documents = document_store(&dir, "documents");
    let path = dir.path().join("old-style-backup.json");
    fs::write(&path, r#"{"properties":[],"tenants":[]}"#).unwrap();

    let result = restore_from(&path, &documents);
    assert!(matches!(result, Err(RentalError::InvalidFormat(_))));
}

#[test]
fn test_restore_keeps_loose_records_unchanged() {
    let dir = TempDir::new().unwrap();
    let documents = document_store(&dir, "documents");

    let archive_path = dir.path().join("presentation.zip");
    let mut zip = ZipWriter::new(fs::File::create(&archive_path).unwrap());
    zip.start_file("data.json", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(PRESENTATION_DATA.as_bytes()).unwrap();
    zip.finish().unwrap();

    let restored = restore_from(&archive_path, &documents).unwrap();
    assert_eq!(restored.tenants.len(), 2);

    let expected: Value = serde_json::from_str(PRESENTATION_DATA).unwrap();
    assert_eq!(serde_json::to_value(&restored).unwrap(), expected);

    // And again through a fresh backup of what was restored
    let second = dir.path().join("second.zip");
    backup(&restored, &documents, &PresetDialog::saving_to(&second)).unwrap();
    let again = restore_from(&second, &documents).unwrap();
    assert_eq!(serde_json::to_value(&again).unwrap(), expected);
}

fn arb_tenant() -> impl Strategy<Value = Tenant> {
    (
        "[a-z0-9-]{1,12}",
        "\\PC{0,20}",
        proptest::option::of(0u32..100_000),
        any::<bool>(),
    )
        .prop_map(|(id, name, rent, is_active)| {
            let tenant = Tenant::new(id.as_str())
                .with("name", name)
                .with("is_active", is_active);
            match rent {
                Some(rent) => tenant.with("monthly_rent", f64::from(rent)),
                None => tenant,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_restore_of_backup_is_identity(
        tenants in proptest::collection::vec(arb_tenant(), 0..5),
        documents in proptest::collection::btree_map("[a-z]{1,8}\\.(pdf|docx|jpg)", proptest::collection::vec(any::<u8>(), 0..256), 0..4),
    ) {
        let dir = TempDir::new().unwrap();
        let store = document_store(&dir, "documents");
        for (name, bytes) in &documents {
            fs::write(store.root().join(name), bytes).unwrap();
        }
        let data = DataSet { tenants, ..Default::default() };

        let archive_path = dir.path().join("backup.zip");
        backup(&data, &store, &PresetDialog::saving_to(&archive_path)).unwrap();
        store.clear().unwrap();

        let restored = restore_from(&archive_path, &store).unwrap();

        prop_assert_eq!(restored, data);
        let names: Vec<String> = documents.keys().cloned().collect();
        prop_assert_eq!(store.list().unwrap(), names);
        for (name, bytes) in &documents {
            prop_assert_eq!(&fs::read(store.root().join(name)).unwrap(), bytes);
        }
    }
}
