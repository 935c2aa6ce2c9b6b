//! Scheduled backup sweeper
//!
//! Runs once per start: keeps one dated copy of the data file per calendar
//! day and prunes copies older than the retention window.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDate};
use rentdesk_common::Result;
use tracing::{debug, error, info, warn};

/// Default retention window in days
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Dated backup created by this run, if any
    pub created: Option<PathBuf>,
    /// Files removed because they fell out of the retention window
    pub pruned: Vec<PathBuf>,
}

/// Daily backup rotation for the primary data file
#[derive(Debug, Clone)]
pub struct BackupSweeper {
    data_file: PathBuf,
    backups_dir: PathBuf,
    retention: Duration,
}

impl BackupSweeper {
    pub fn new(data_file: impl Into<PathBuf>, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            backups_dir: backups_dir.into(),
            retention: Duration::from_secs(DEFAULT_RETENTION_DAYS * SECONDS_PER_DAY),
        }
    }

    pub fn with_retention_days(mut self, days: u64) -> Self {
        self.retention = Duration::from_secs(days * SECONDS_PER_DAY);
        self
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Dated backup file for `date`
    pub fn backup_path_for(&self, date: NaiveDate) -> PathBuf {
        self.backups_dir
            .join(format!("data-backup-{}.json", date.format("%Y-%m-%d")))
    }

    /// Create today's backup if missing, then prune expired files
    ///
    /// Does nothing when there is no data file yet.
    pub fn sweep(&self, now: DateTime<Local>) -> Result<SweepReport> {
        let mut report = SweepReport::default();
        if !self.data_file.is_file() {
            debug!(path = %self.data_file.display(), "No data file, skipping backup sweep");
            return Ok(report);
        }

        fs::create_dir_all(&self.backups_dir)?;
        let now_time = SystemTime::from(now);

        let target = self.backup_path_for(now.date_naive());
        if !target.exists() {
            fs::copy(&self.data_file, &target)?;
            // Some platforms carry the source mtime over; retention counts from today
            fs::File::options()
                .write(true)
                .open(&target)?
                .set_modified(now_time)?;
            info!(path = %target.display(), "Created daily backup");
            report.created = Some(target);
        }

        let Some(cutoff) = now_time.checked_sub(self.retention) else {
            return Ok(report);
        };

        report.pruned = remove_backups(self.expired_backups(cutoff)?);
        Ok(report)
    }

    /// Files in the backup directory last modified before `cutoff`
    ///
    /// An entry whose metadata cannot be read is logged and kept.
    fn expired_backups(&self, cutoff: SystemTime) -> Result<Vec<PathBuf>> {
        let mut expired = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Failed to read backup directory entry");
                    continue;
                }
            };
            let path = entry.path();
            match entry.metadata().and_then(|m| Ok((m.is_file(), m.modified()?))) {
                Ok((true, modified)) if modified < cutoff => expired.push(path),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to stat backup"),
            }
        }
        expired.sort();
        Ok(expired)
    }

    /// Sweep at startup; failures are logged and never reach the caller
    pub fn run_startup_sweep(&self) -> SweepReport {
        match self.sweep(Local::now()) {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Failed to create or clean up backups");
                SweepReport::default()
            }
        }
    }
}

/// Delete each path, returning the ones removed
fn remove_backups(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "Deleted old backup");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to delete old backup");
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BackupSweeper) {
        let dir = TempDir::new().unwrap();
        let sweeper = BackupSweeper::new(dir.path().join("data.json"), dir.path().join("backups"));
        (dir, sweeper)
    }

    fn set_age(path: &Path, age: Duration) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    #[test]
    fn test_no_data_file_is_noop() {
        let (_dir, sweeper) = setup();
        let report = sweeper.sweep(Local::now()).unwrap();
        assert_eq!(report, SweepReport::default());
        assert!(!sweeper.backups_dir().exists());
    }

    #[test]
    fn test_creates_dated_copy() {
        let (dir, sweeper) = setup();
        fs::write(dir.path().join("data.json"), r#"{"tenants":[]}"#).unwrap();

        let now = Local::now();
        let report = sweeper.sweep(now).unwrap();

        let expected = sweeper.backup_path_for(now.date_naive());
        assert_eq!(report.created.as_ref(), Some(&expected));
        assert_eq!(fs::read_to_string(&expected).unwrap(), r#"{"tenants":[]}"#);
        assert!(
            expected
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("data-backup-")
        );
    }

    #[test]
    fn test_sweep_twice_same_day_creates_one_backup() {
        let (dir, sweeper) = setup();
        fs::write(dir.path().join("data.json"), "{}").unwrap();

        let now = Local::now();
        let first = sweeper.sweep(now).unwrap();
        let second = sweeper.sweep(now).unwrap();

        assert!(first.created.is_some());
        assert!(second.created.is_none());
        assert_eq!(fs::read_dir(sweeper.backups_dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_existing_backup_is_not_overwritten() {
        let (dir, sweeper) = setup();
        fs::write(dir.path().join("data.json"), "new").unwrap();
        fs::create_dir_all(sweeper.backups_dir()).unwrap();
        let now = Local::now();
        let today = sweeper.backup_path_for(now.date_naive());
        fs::write(&today, "morning").unwrap();

        sweeper.sweep(now).unwrap();
        assert_eq!(fs::read_to_string(&today).unwrap(), "morning");
    }

    #[test]
    fn test_retention_prunes_old_files_only() {
        let (dir, sweeper) = setup();
        fs::write(dir.path().join("data.json"), "{}").unwrap();
        fs::create_dir_all(sweeper.backups_dir()).unwrap();

        let old = sweeper.backups_dir().join("data-backup-2000-01-01.json");
        let recent = sweeper.backups_dir().join("data-backup-2000-01-02.json");
        fs::write(&old, "old").unwrap();
        fs::write(&recent, "recent").unwrap();
        set_age(&old, Duration::from_secs(8 * SECONDS_PER_DAY));
        set_age(&recent, Duration::from_secs(6 * SECONDS_PER_DAY));

        let report = sweeper.sweep(Local::now()).unwrap();

        assert_eq!(report.pruned, vec![old.clone()]);
        assert!(!old.exists());
        assert!(recent.exists());
        assert!(report.created.as_ref().unwrap().exists());
    }

    #[test]
    fn test_file_modified_now_is_retained() {
        let (dir, sweeper) = setup();
        fs::write(dir.path().join("data.json"), "{}").unwrap();
        fs::create_dir_all(sweeper.backups_dir()).unwrap();
        let fresh = sweeper.backups_dir().join("manual.json");
        fs::write(&fresh, "x").unwrap();

        let report = sweeper.sweep(Local::now()).unwrap();
        assert!(report.pruned.is_empty());
        assert!(fresh.exists());
    }

    #[test]
    fn test_custom_retention() {
        let (dir, sweeper) = setup();
        let sweeper = sweeper.with_retention_days(1);
        fs::write(dir.path().join("data.json"), "{}").unwrap();
        fs::create_dir_all(sweeper.backups_dir()).unwrap();
        let stale = sweeper.backups_dir().join("data-backup-2000-01-01.json");
        fs::write(&stale, "x").unwrap();
        set_age(&stale, Duration::from_secs(2 * SECONDS_PER_DAY));

        let report = sweeper.sweep(Local::now()).unwrap();
        assert_eq!(report.pruned, vec![stale]);
    }

    #[test]
    fn test_startup_sweep_swallows_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.json"), "{}").unwrap();
        // A regular file where the backup directory should be
        fs::write(dir.path().join("backups"), "not a dir").unwrap();

        let sweeper = BackupSweeper::new(dir.path().join("data.json"), dir.path().join("backups"));
        assert_eq!(sweeper.run_startup_sweep(), SweepReport::default());
    }

    #[test]
    fn test_failed_removal_does_not_stop_pruning() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("data-backup-2000-01-01.json");
        let gone = dir.path().join("data-backup-2000-01-02.json");
        let last = dir.path().join("data-backup-2000-01-03.json");
        fs::write(&first, "x").unwrap();
        fs::write(&last, "x").unwrap();

        let removed = remove_backups(vec![first.clone(), gone, last.clone()]);

        assert_eq!(removed, vec![first.clone(), last.clone()]);
        assert!(!first.exists());
        assert!(!last.exists());
    }
}
