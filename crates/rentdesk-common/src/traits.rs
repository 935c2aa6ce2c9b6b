//! Host collaborator traits
//!
//! The presentation layer owns native dialogs, the system viewer and desktop
//! notifications. These traits abstract them so the pipelines can be driven
//! from the desktop shell, the CLI, or tests.

use std::io;
use std::path::{Path, PathBuf};

/// File chooser used by every operation that asks the user for a location.
///
/// Returning `None` means the dialog was dismissed.
pub trait FileDialog: Send + Sync {
    /// Ask for a destination file
    fn save_path(&self, title: &str, default_name: &str) -> Option<PathBuf>;

    /// Ask for an existing file, optionally restricted to extensions
    fn open_path(&self, title: &str, extensions: &[&str]) -> Option<PathBuf>;
}

/// Desktop integration provided by the host system
pub trait SystemShell: Send + Sync {
    /// Hand a file to the default viewer
    fn open_path(&self, path: &Path) -> io::Result<()>;

    /// Reveal a file in the system file manager
    fn show_item_in_folder(&self, path: &Path) -> io::Result<()>;

    /// Open a URL in the default browser
    fn open_external(&self, url: &str) -> io::Result<()>;

    /// Show a desktop notification
    fn notify(&self, title: &str, body: &str) -> io::Result<()>;

    /// Whether the host prefers a dark color scheme
    fn prefers_dark(&self) -> bool;
}

/// Dialog answered up-front, for headless and command line use.
#[derive(Debug, Clone, Default)]
pub struct PresetDialog {
    save: Option<PathBuf>,
    open: Option<PathBuf>,
}

impl PresetDialog {
    /// Dialog that is always dismissed
    pub fn canceled() -> Self {
        Self::default()
    }

    pub fn saving_to(path: impl Into<PathBuf>) -> Self {
        Self {
            save: Some(path.into()),
            open: None,
        }
    }

    pub fn opening(path: impl Into<PathBuf>) -> Self {
        Self {
            save: None,
            open: Some(path.into()),
        }
    }
}

impl FileDialog for PresetDialog {
    fn save_path(&self, _title: &str, _default_name: &str) -> Option<PathBuf> {
        self.save.clone()
    }

    fn open_path(&self, _title: &str, _extensions: &[&str]) -> Option<PathBuf> {
        self.open.clone()
    }
}
