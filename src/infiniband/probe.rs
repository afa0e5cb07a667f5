use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ProbeConfig;
use crate::infiniband::system::SystemAccess;

/// Read-only queries against one host. Holds no state of its own: every
/// call re-probes through `system`.
pub struct InfinibandProbe<'a> {
    pub(crate) system: &'a dyn SystemAccess,
    pub(crate) config: &'a ProbeConfig,
}

impl<'a> InfinibandProbe<'a> {
    pub fn new(system: &'a dyn SystemAccess, config: &'a ProbeConfig) -> Self {
        Self { system, config }
    }

    pub(crate) fn sysfs_root(&self) -> &Path {
        &self.config.sysfs_root
    }

    /// Trimmed contents of a sysfs file. Missing, unreadable and empty files
    /// all yield `None`.
    pub(crate) fn read_sysfs(&self, path: &Path) -> Option<String> {
        if !self.system.exists(path) {
            debug!(path = %path.display(), "sysfs file absent");
            return None;
        }
        self.system
            .read_file(path)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Runs a tool if installed. `None` when it is missing or fails.
    pub(crate) fn run_tool(&self, program: &str, args: &[&str]) -> Option<String> {
        if !self.system.has_tool(program) {
            debug!(program, "tool not installed");
            return None;
        }
        self.system.run(program, args)
    }

    /// `<root>/<hca>/ports/<port>` if it exists.
    pub(crate) fn port_sysfs_path(&self, hca: &str, port: &str) -> Option<PathBuf> {
        let path = self.sysfs_root().join(hca).join("ports").join(port);
        if !self.system.exists(&path) {
            debug!(hca, port, "port not present in sysfs");
            return None;
        }
        Some(path)
    }
}
