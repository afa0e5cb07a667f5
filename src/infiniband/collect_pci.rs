use std::sync::LazyLock;

use pciid_parser::Database;
use regex::Regex;
use tracing::debug;

use crate::infiniband::probe::InfinibandProbe;
use crate::infiniband::types::PciDevice;

// Vendors shipping InfiniBand silicon.
// REF: http://cateee.net/lkddb/web-lkddb/INFINIBAND.html
const IB_VENDORS: &str = "1077|15b3|1678|1867|18b8|1fc1";

// Applied in this order; class codes are disjoint so a line matches at most
// one pattern.
//   0c06 serial bus controller: InfiniBand (any vendor)
//   0207 network controller: InfiniBand (any vendor)
//   0280 network controller: other (InfiniBand vendors only)
static DEVICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(\S+)\s+(0c06):\s+([0-9a-fA-F]{4}):([0-9a-fA-F]{4})".to_string(),
        r"^(\S+)\s+(0207):\s+([0-9a-fA-F]{4}):([0-9a-fA-F]{4})".to_string(),
        format!(r"^(\S+)\s+(0280):\s+({IB_VENDORS}):([0-9a-fA-F]{{4}})"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("device pattern is a valid regex"))
    .collect()
});

impl InfinibandProbe<'_> {
    /// Bus addresses of InfiniBand PCI functions. The length is the device
    /// count; duplicates are kept.
    pub fn device_ids(&self) -> Vec<String> {
        self.scan_lspci()
            .into_iter()
            .map(|device| device.device_id)
            .collect()
    }

    /// Same scan as `device_ids`, with names from the system pci.ids database.
    pub fn pci_devices(&self) -> Vec<PciDevice> {
        let mut devices = self.scan_lspci();
        if devices.is_empty() {
            return devices;
        }

        let db = match Database::read() {
            Ok(db) => Some(db),
            Err(e) => {
                debug!(error = %e, "pci.ids database unavailable");
                None
            }
        };
        annotate_devices(&mut devices, db.as_ref());
        devices
    }

    fn scan_lspci(&self) -> Vec<PciDevice> {
        let lspci = &self.config.tools.lspci;
        match self.run_tool(lspci, &["-n"]) {
            Some(output) => parse_lspci(&output),
            None => Vec::new(),
        }
    }
}

/// Matches `lspci -n` output against the device patterns, pattern by pattern.
pub fn parse_lspci(output: &str) -> Vec<PciDevice> {
    let mut devices = Vec::new();

    for pattern in DEVICE_PATTERNS.iter() {
        for line in output.lines() {
            if let Some(caps) = pattern.captures(line) {
                devices.push(PciDevice {
                    device_id: caps[1].to_string(),
                    class_code: caps[2].to_string(),
                    vendor_id: caps[3].to_lowercase(),
                    product_id: caps[4].to_lowercase(),
                    vendor_name: None,
                    product_name: None,
                });
            }
        }
    }

    debug!(count = devices.len(), "InfiniBand PCI functions found");
    devices
}

/// Fills in vendor/product names. Without a database the names stay `None`.
pub fn annotate_devices(devices: &mut [PciDevice], db: Option<&Database>) {
    let Some(db) = db else {
        return;
    };
    for device in devices.iter_mut() {
        annotate_device(device, db);
    }
}

fn annotate_device(device: &mut PciDevice, db: &Database) {
    let vendor_id = match u16::from_str_radix(&device.vendor_id, 16) {
        Ok(id) => id,
        Err(_) => return,
    };
    let product_id = u16::from_str_radix(&device.product_id, 16).ok();

    if let Some(vendor) = db.vendors.get(&vendor_id) {
        device.vendor_name = Some(vendor.name.clone());
        device.product_name = product_id
            .and_then(|id| vendor.devices.get(&id))
            .map(|d| d.name.clone());
    }
}
