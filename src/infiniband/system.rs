use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Everything the probes need from the host: tool lookup, command output,
/// file contents and directory listings.
pub trait SystemAccess {
    /// True when `program` resolves on PATH.
    fn has_tool(&self, program: &str) -> bool;

    /// Stdout of a successful run, `None` if the command could not be
    /// spawned or exited non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Option<String>;

    /// Raw file contents, `None` if the file is missing or unreadable.
    fn read_file(&self, path: &Path) -> Option<String>;

    /// Entry names directly under `path`, empty if it is not a readable
    /// directory.
    fn list_dir(&self, path: &Path) -> Vec<String>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

/// The live host.
pub struct HostSystem;

impl SystemAccess for HostSystem {
    fn has_tool(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        let output = match Command::new(program).args(args).output() {
            Ok(o) => o,
            Err(e) => {
                debug!(program, ?args, error = %e, "failed to spawn command");
                return None;
            }
        };

        if !output.status.success() {
            debug!(program, ?args, status = ?output.status.code(), "command exited unsuccessfully");
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }

    fn list_dir(&self, path: &Path) -> Vec<String> {
        let entries = match fs::read_dir(path) {
            Ok(e) => e,
            Err(_) => return Vec::new(),
        };

        entries
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
