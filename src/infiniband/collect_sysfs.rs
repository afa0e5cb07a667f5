use tracing::debug;

use crate::infiniband::probe::InfinibandProbe;

impl InfinibandProbe<'_> {
    /// HCA names under the InfiniBand class directory, in listing order.
    pub fn hcas(&self) -> Vec<String> {
        let root = self.sysfs_root();
        if !self.system.is_dir(root) {
            debug!(root = %root.display(), "InfiniBand sysfs class directory absent");
            return Vec::new();
        }
        self.system.list_dir(root)
    }

    /// Legacy discovery path: same listing, each entry treated as a port.
    pub fn ports(&self) -> Vec<String> {
        self.system.list_dir(self.sysfs_root())
    }

    pub fn hca_board_id(&self, hca: &str) -> Option<String> {
        self.read_sysfs(&self.sysfs_root().join(hca).join("board_id"))
    }

    pub fn port_board_id(&self, port: &str) -> Option<String> {
        self.hca_board_id(port)
    }

    /// Raw rate text of the first port directory under `<port>/ports/`.
    pub fn port_rate(&self, port: &str) -> Option<String> {
        let ports_dir = self.sysfs_root().join(port).join("ports");
        let mut entries = self.system.list_dir(&ports_dir);
        entries.sort();
        let first = entries.into_iter().next()?;
        self.read_sysfs(&ports_dir.join(first).join("rate"))
    }

    /// Leading number of `<hca>/ports/<port>/rate`, e.g. "40" for
    /// "40 Gb/sec (4X QDR)".
    pub fn real_port_rate(&self, hca: &str, port: &str) -> Option<String> {
        let path = self.port_sysfs_path(hca, port)?;
        let rate = self.read_sysfs(&path.join("rate"))?;
        parse_rate(&rate)
    }

    /// State name of `<hca>/ports/<port>/state`, e.g. "ACTIVE" for "4: ACTIVE".
    pub fn real_port_state(&self, hca: &str, port: &str) -> Option<String> {
        let path = self.port_sysfs_path(hca, port)?;
        let state = self.read_sysfs(&path.join("state"))?;
        parse_state(&state)
    }

    /// "InfiniBand" or "Ethernet".
    pub fn real_port_link_layer(&self, hca: &str, port: &str) -> Option<String> {
        let path = self.port_sysfs_path(hca, port)?;
        self.read_sysfs(&path.join("link_layer"))
    }
}

/// Whole-number rate only: "2.5 Gb/sec" has no integer token and yields `None`.
pub fn parse_rate(rate: &str) -> Option<String> {
    let (number, _unit) = rate.split_once(char::is_whitespace)?;
    let is_integer = !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    is_integer.then(|| number.to_string())
}

pub fn parse_state(state: &str) -> Option<String> {
    state.split_once(": ").map(|(_code, name)| name.to_string())
}
