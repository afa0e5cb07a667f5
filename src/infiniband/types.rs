use serde::Serialize;
use std::collections::BTreeMap;

/// InfiniBand-capable PCI function as listed by `lspci -n`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PciDevice {
    pub device_id: String, // bus address, e.g. "05:00.0"
    pub class_code: String,
    pub vendor_id: String,
    pub product_id: String,
    pub vendor_name: Option<String>,
    pub product_name: Option<String>,
}

/// Firmware of one PCI function, as reported by mstflint.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DeviceFirmware {
    pub device_id: String,
    pub fw_version: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NetdevRecord {
    pub hca: String,
    pub port: String,
    pub state: Option<String>,
    pub rate: Option<String>,
    pub link_layer: Option<String>,
}

/// Adapter family, resolved from the HCA/port name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorFamily {
    Mellanox, // mlx*
    QLogic,   // qib*
    Unknown,
}

impl VendorFamily {
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("mlx") {
            VendorFamily::Mellanox
        } else if name.starts_with("qib") {
            VendorFamily::QLogic
        } else {
            VendorFamily::Unknown
        }
    }

    /// Sysfs file holding the firmware version for this family.
    pub fn firmware_file(self) -> Option<&'static str> {
        match self {
            VendorFamily::Mellanox => Some("fw_ver"),
            VendorFamily::QLogic => Some("version"),
            VendorFamily::Unknown => None,
        }
    }
}

pub type PortGuids = BTreeMap<String, String>;

/// Named facts handed to the configuration-management agent. `None`
/// serializes as `null`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FactSet {
    pub collected_at: String,
    pub kernel: String,
    pub has_infiniband: bool,
    pub infiniband_num_devices: Option<usize>,
    pub infiniband_devices: Option<Vec<PciDevice>>,
    pub infiniband_fw_version: Option<String>,
    pub infiniband_board_id: Option<String>,
    pub infiniband_rate: Option<String>,
    pub infiniband_hcas: Option<Vec<String>>,
    pub infiniband_hca_board_ids: Option<BTreeMap<String, String>>,
    pub infiniband_hca_port_guids: Option<BTreeMap<String, PortGuids>>,
    pub infiniband_port_fw_versions: Option<BTreeMap<String, String>>,
    pub infiniband_netdevs: Option<BTreeMap<String, NetdevRecord>>,
}
