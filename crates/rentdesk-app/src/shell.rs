//! Desktop integration through the platform's opener commands

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use rentdesk_common::SystemShell;
use tracing::{debug, info};

/// [`SystemShell`] backed by `xdg-open`, `open` or `explorer`
#[derive(Debug, Clone, Default)]
pub struct DesktopShell;

impl DesktopShell {
    pub fn new() -> Self {
        Self
    }

    fn spawn(program: &str, args: &[&OsStr]) -> io::Result<()> {
        debug!(program = %program, "Spawning desktop helper");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }

    #[cfg(target_os = "macos")]
    fn open_target(target: &OsStr) -> io::Result<()> {
        Self::spawn("open", &[target])
    }

    #[cfg(target_os = "windows")]
    fn open_target(target: &OsStr) -> io::Result<()> {
        Self::spawn("cmd", &[OsStr::new("/C"), OsStr::new("start"), OsStr::new(""), target])
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn open_target(target: &OsStr) -> io::Result<()> {
        Self::spawn("xdg-open", &[target])
    }
}

/// Theme override from `RENTDESK_THEME`, then the GTK theme name
fn env_prefers_dark() -> Option<bool> {
    if let Ok(theme) = std::env::var("RENTDESK_THEME") {
        match theme.to_ascii_lowercase().as_str() {
            "dark" => return Some(true),
            "light" => return Some(false),
            _ => {}
        }
    }
    std::env::var("GTK_THEME")
        .ok()
        .map(|theme| theme.to_ascii_lowercase().contains("dark"))
}

impl SystemShell for DesktopShell {
    fn open_path(&self, path: &Path) -> io::Result<()> {
        Self::open_target(path.as_os_str())
    }

    fn show_item_in_folder(&self, path: &Path) -> io::Result<()> {
        #[cfg(target_os = "macos")]
        {
            Self::spawn("open", &[OsStr::new("-R"), path.as_os_str()])
        }
        #[cfg(target_os = "windows")]
        {
            let mut select = std::ffi::OsString::from("/select,");
            select.push(path.as_os_str());
            Self::spawn("explorer", &[select.as_os_str()])
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let folder = path.parent().unwrap_or(path);
            Self::open_target(folder.as_os_str())
        }
    }

    fn open_external(&self, url: &str) -> io::Result<()> {
        Self::open_target(OsStr::new(url))
    }

    fn notify(&self, title: &str, body: &str) -> io::Result<()> {
        info!(title = %title, "{}", body);
        #[cfg(target_os = "macos")]
        {
            let escape = |s: &str| s.replace('\\', "\\\\").replace('"', "\\\"");
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                escape(body),
                escape(title)
            );
            Self::spawn("osascript", &[OsStr::new("-e"), OsStr::new(&script)])
        }
        #[cfg(target_os = "windows")]
        {
            Ok(())
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Self::spawn("notify-send", &[OsStr::new(title), OsStr::new(body)])
        }
    }

    fn prefers_dark(&self) -> bool {
        env_prefers_dark().unwrap_or(false)
    }
}
