// InfiniBand probes: PCI scan, sysfs attributes, vendor tools and the fact layer
pub mod types;
pub mod system;
pub mod probe;
pub mod collect_pci;
pub mod collect_firmware;
pub mod collect_sysfs;
pub mod collect_guids;
pub mod collect_netdev;
pub mod collect_facts;

#[cfg(test)]
pub mod fake;

pub use collect_facts::{collect_facts, fact_value};
pub use probe::InfinibandProbe;
pub use system::HostSystem;
