//! File prompts answered from command line arguments

use std::path::PathBuf;

use rentdesk_common::FileDialog;

/// Answers every prompt with the path given on the command line
///
/// Save prompts without a path fall back to the suggested file name in the
/// working directory.
#[derive(Debug, Clone, Default)]
pub struct CommandLineDialog {
    path: Option<PathBuf>,
}

impl CommandLineDialog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl FileDialog for CommandLineDialog {
    fn save_path(&self, _title: &str, default_name: &str) -> Option<PathBuf> {
        Some(
            self.path
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_name)),
        )
    }

    fn open_path(&self, _title: &str, _extensions: &[&str]) -> Option<PathBuf> {
        self.path.clone()
    }
}
