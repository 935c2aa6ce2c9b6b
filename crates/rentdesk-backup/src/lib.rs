//! RentDesk Backup - Archive backup/restore and the daily backup sweeper

pub mod archive;
pub mod pipeline;
pub mod sweep;

pub use archive::{BackupArchive, DATA_ENTRY, DOCUMENTS_PREFIX, parse_backup_data, write_backup_archive};
pub use pipeline::{backup, backup_to, default_backup_name, restore, restore_from};
pub use sweep::{BackupSweeper, DEFAULT_RETENTION_DAYS, SweepReport};
