//! RentDesk Store - Local persistence
//!
//! - [`DataStore`]: the primary JSON data file
//! - [`SettingsStore`]: user settings with defaults
//! - [`DocumentStore`]: uploaded attachments and contract templates

pub mod data_store;
pub mod document_store;
pub mod fs;
pub mod model;
pub mod settings;

pub use data_store::DataStore;
pub use document_store::{DocumentStore, StoredDocument};
pub use model::{DataSet, Event, Expense, LedgerRecord, Payment, Property, RecordId, Tenant};
pub use settings::{Settings, SettingsStore};
