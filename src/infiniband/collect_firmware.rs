use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::infiniband::probe::InfinibandProbe;
use crate::infiniband::types::{DeviceFirmware, VendorFamily};

// e.g. "FW Version:            16.35.2000"
static FW_VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*FW Version:\s+(\d+(?:\.\d+)*)").expect("firmware pattern is a valid regex")
});

impl InfinibandProbe<'_> {
    /// One firmware version per entry of `device_ids`, in the same order.
    pub fn firmware_versions(&self) -> Option<Vec<String>> {
        let firmware = self.device_firmware()?;
        Some(firmware.into_iter().map(|fw| fw.fw_version).collect())
    }

    /// Firmware paired with its device from a single PCI scan. Duplicate
    /// devices keep their own entry. A single failed query drops the whole
    /// list so positions never drift.
    pub fn device_firmware(&self) -> Option<Vec<DeviceFirmware>> {
        let device_ids = self.device_ids();
        if device_ids.is_empty() {
            return None;
        }

        let mstflint = &self.config.tools.mstflint;
        if !self.system.has_tool(mstflint) {
            debug!(program = %mstflint, "tool not installed");
            return None;
        }

        let mut firmware = Vec::with_capacity(device_ids.len());
        for device_id in device_ids {
            let output = self
                .system
                .run(mstflint, &["-device", device_id.as_str(), "-qq", "query"])
                .filter(|out| !out.trim().is_empty());

            let Some(output) = output else {
                debug!(device_id = %device_id, "firmware query returned nothing, abandoning list");
                return None;
            };

            let Some(fw_version) = parse_fw_version(&output) else {
                debug!(device_id = %device_id, "firmware query has no FW Version line, abandoning list");
                return None;
            };
            firmware.push(DeviceFirmware {
                device_id,
                fw_version,
            });
        }

        Some(firmware)
    }

    /// Firmware of an HCA/port from sysfs (`fw_ver` for mlx, `version` for
    /// qib). Other families are not read at all.
    pub fn port_fw_version(&self, port: &str) -> Option<String> {
        let file = VendorFamily::from_name(port).firmware_file()?;
        self.read_sysfs(&self.sysfs_root().join(port).join(file))
    }
}

/// First `FW Version:` value in mstflint query output.
pub fn parse_fw_version(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| FW_VERSION_LINE.captures(line))
        .map(|caps| caps[1].to_string())
}
