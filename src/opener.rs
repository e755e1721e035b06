//! Revealing the destination folder after a run.

use std::{
    io,
    path::Path,
    process::{Command, ExitStatus},
    thread::{self, JoinHandle},
};

/// Opens a folder in the platform's file browser.
pub trait FolderOpener {
    /// Try to open `path`. Returns `false` if the platform has no way to do
    /// it or the attempt failed, in which case the caller should show the
    /// path instead.
    fn open_folder(&self, path: &Path) -> bool;
}

/// Uses `explorer` on Windows, `open` on macOS and `xdg-open` on other Unix
/// systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFolderOpener;

impl SystemFolderOpener {
    fn program() -> Option<&'static str> {
        if cfg!(target_os = "windows") {
            Some("explorer")
        } else if cfg!(target_os = "macos") {
            Some("open")
        } else if cfg!(unix) {
            Some("xdg-open")
        } else {
            None
        }
    }
}

impl FolderOpener for SystemFolderOpener {
    fn open_folder(&self, path: &Path) -> bool {
        let Some(program) = Self::program() else {
            log::debug!("No folder browser available on this platform");
            return false;
        };

        launch(program, path).is_some()
    }
}

/// Spawn `program path` and reap it on a background thread once it exits.
fn launch(program: &str, path: &Path) -> Option<JoinHandle<io::Result<ExitStatus>>> {
    match Command::new(program).arg(path).spawn() {
        Ok(mut child) => Some(thread::spawn(move || child.wait())),
        Err(error) => {
            log::debug!("Could not launch {program} for {}: {error}", path.display());
            None
        }
    }
}

/// Never opens anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpOpener;

impl FolderOpener for NoOpOpener {
    fn open_folder(&self, _path: &Path) -> bool {
        false
    }
}
