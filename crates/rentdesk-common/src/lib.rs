//! RentDesk Common - Shared types, traits, and utilities
//!
//! This crate provides the foundational types used across all RentDesk components:
//! - Error types and error codes
//! - Host collaborator traits (file dialogs, system shell)
//! - Date and amount formatting helpers
//! - Common constants

pub mod error;
pub mod traits;
pub mod utils;

// Re-exports for convenience
pub use error::{AppError, ErrorCode, RentalError, Result};
pub use traits::*;
pub use utils::{
    format_amount, format_date, format_display_date, is_valid_date_format, is_valid_file_id,
    parse_iso_date,
};

/// Name of the primary data file inside the data directory
pub const DATA_FILE_NAME: &str = "data.json";

/// Name of the settings file inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Name of the document store directory inside the data directory
pub const DOCUMENTS_DIR_NAME: &str = "documents";

/// Name of the dated backup directory inside the data directory
pub const BACKUPS_DIR_NAME: &str = "backups";

/// Default date format for contracts and notices (zero-padded day.month.year)
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";
