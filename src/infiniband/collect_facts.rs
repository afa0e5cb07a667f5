use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info};

use crate::infiniband::probe::InfinibandProbe;
use crate::infiniband::types::{FactSet, PortGuids};

/// Fact names, in the order they are reported.
pub const FACT_NAMES: &[&str] = &[
    "kernel",
    "has_infiniband",
    "infiniband_num_devices",
    "infiniband_devices",
    "infiniband_fw_version",
    "infiniband_board_id",
    "infiniband_rate",
    "infiniband_hcas",
    "infiniband_hca_board_ids",
    "infiniband_hca_port_guids",
    "infiniband_port_fw_versions",
    "infiniband_netdevs",
];

/// Kernel name as configuration agents report it.
pub fn host_kernel() -> String {
    match std::env::consts::OS {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => other.to_string(),
    }
}

pub fn collect_facts(probe: &InfinibandProbe) -> FactSet {
    collect_facts_for_kernel(probe, &host_kernel())
}

/// InfiniBand facts are only resolved on Linux hosts that have InfiniBand
/// hardware; everywhere else they are null.
pub fn collect_facts_for_kernel(probe: &InfinibandProbe, kernel: &str) -> FactSet {
    let mut facts = FactSet {
        collected_at: Utc::now().to_rfc3339(),
        kernel: kernel.to_string(),
        has_infiniband: false,
        infiniband_num_devices: None,
        infiniband_devices: None,
        infiniband_fw_version: None,
        infiniband_board_id: None,
        infiniband_rate: None,
        infiniband_hcas: None,
        infiniband_hca_board_ids: None,
        infiniband_hca_port_guids: None,
        infiniband_port_fw_versions: None,
        infiniband_netdevs: None,
    };

    if kernel != "Linux" {
        debug!(kernel, "not a Linux kernel, skipping InfiniBand facts");
        return facts;
    }

    let devices = probe.pci_devices();
    let hcas = probe.hcas();
    facts.has_infiniband = !devices.is_empty() || !hcas.is_empty();
    if !facts.has_infiniband {
        debug!("no InfiniBand devices or HCAs found");
        return facts;
    }

    let ports = probe.ports();

    facts.infiniband_num_devices = Some(devices.len());
    facts.infiniband_fw_version = probe
        .firmware_versions()
        .and_then(|versions| versions.into_iter().next());
    facts.infiniband_devices = non_empty_vec(devices);
    facts.infiniband_board_id = ports.first().and_then(|port| probe.port_board_id(port));
    facts.infiniband_rate = ports.first().and_then(|port| probe.port_rate(port));
    facts.infiniband_hca_board_ids = non_empty_map(
        hcas.iter()
            .filter_map(|hca| probe.hca_board_id(hca).map(|id| (hca.clone(), id)))
            .collect(),
    );
    facts.infiniband_hca_port_guids = hca_port_guids(probe, &hcas);
    facts.infiniband_port_fw_versions = non_empty_map(
        ports
            .iter()
            .filter_map(|port| probe.port_fw_version(port).map(|fw| (port.clone(), fw)))
            .collect(),
    );
    facts.infiniband_netdevs = non_empty_map(probe.netdev_to_hca_port());
    facts.infiniband_hcas = non_empty_vec(hcas);

    info!(
        devices = facts.infiniband_num_devices.unwrap_or(0),
        hcas = facts.infiniband_hcas.as_ref().map_or(0, Vec::len),
        "collected InfiniBand facts"
    );
    facts
}

/// HCAs whose GUID map came back empty are dropped; nothing left means null.
fn hca_port_guids(probe: &InfinibandProbe, hcas: &[String]) -> Option<BTreeMap<String, PortGuids>> {
    if hcas.is_empty() {
        return None;
    }
    non_empty_map(
        hcas.iter()
            .map(|hca| (hca.clone(), probe.hca_port_guids(hca)))
            .filter(|(_, guids)| !guids.is_empty())
            .collect(),
    )
}

fn non_empty_vec<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

fn non_empty_map<V>(values: BTreeMap<String, V>) -> Option<BTreeMap<String, V>> {
    (!values.is_empty()).then_some(values)
}

/// One fact by name, as JSON. `None` for an unknown name.
pub fn fact_value(facts: &FactSet, name: &str) -> Option<serde_json::Value> {
    if !FACT_NAMES.contains(&name) {
        return None;
    }
    let value = serde_json::to_value(facts).ok()?;
    value.get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::infiniband::fake::FakeSystem;
    use serde_json::json;

    const ROOT: &str = "/sys/class/infiniband";

    fn dual_hca_system() -> FakeSystem {
        FakeSystem::new()
            .with_output("lspci", &["-n"], "05:00.0 0207: 15b3:1017\n06:00.0 0207: 15b3:1017\n")
            .with_output(
                "mstflint",
                &["-device", "05:00.0", "-qq", "query"],
                "FW Version:            16.35.2000\n",
            )
            .with_output(
                "mstflint",
                &["-device", "06:00.0", "-qq", "query"],
                "FW Version:            16.35.1012\n",
            )
            .with_output("ibstat", &["-p", "mlx5_0"], "0x506b4b0300cc4348\n")
            .with_output("ibstat", &["-p", "mlx5_2"], "0x506b4b0300cc4342\n")
            .with_output("ibdev2netdev", &[], "mlx5_0 port 1 ==> ib0 (Up)\n")
            .with_file(format!("{ROOT}/mlx5_0/board_id"), "MT_0000000223\n")
            .with_file(format!("{ROOT}/mlx5_0/fw_ver"), "16.35.2000\n")
            .with_file(format!("{ROOT}/mlx5_0/ports/1/rate"), "100 Gb/sec (4X EDR)\n")
            .with_file(format!("{ROOT}/mlx5_0/ports/1/state"), "4: ACTIVE\n")
            .with_file(format!("{ROOT}/mlx5_0/ports/1/link_layer"), "InfiniBand\n")
            .with_file(format!("{ROOT}/mlx5_2/board_id"), "MT_0000000224\n")
            .with_file(format!("{ROOT}/mlx5_2/ports/1/rate"), "100 Gb/sec (4X EDR)\n")
    }

    #[test]
    fn test_collect_facts_dual_hca() {
        let system = dual_hca_system();
        let config = ProbeConfig::default();
        let probe = InfinibandProbe::new(&system, &config);

        let facts = collect_facts_for_kernel(&probe, "Linux");
        assert!(facts.has_infiniband);
        assert_eq!(facts.infiniband_num_devices, Some(2));
        assert_eq!(facts.infiniband_fw_version.as_deref(), Some("16.35.2000"));
        assert_eq!(facts.infiniband_board_id.as_deref(), Some("MT_0000000223"));
        assert_eq!(facts.infiniband_rate.as_deref(), Some("100 Gb/sec (4X EDR)"));
        assert_eq!(
            facts.infiniband_hcas,
            Some(vec!["mlx5_0".to_string(), "mlx5_2".to_string()])
        );

        let guids = serde_json::to_value(&facts.infiniband_hca_port_guids).unwrap();
        assert_eq!(
            guids,
            json!({
                "mlx5_0": { "1": "0x506b4b0300cc4348" },
                "mlx5_2": { "1": "0x506b4b0300cc4342" },
            })
        );

        let port_fw = facts.infiniband_port_fw_versions.unwrap();
        assert_eq!(port_fw.len(), 1);
        assert_eq!(port_fw["mlx5_0"], "16.35.2000");

        let netdevs = facts.infiniband_netdevs.unwrap();
        assert_eq!(netdevs["ib0"].rate.as_deref(), Some("100"));
    }

    #[test]
    fn test_non_linux_kernel_is_confined() {
        let system = dual_hca_system();
        let config = ProbeConfig::default();
        let probe = InfinibandProbe::new(&system, &config);

        let facts = collect_facts_for_kernel(&probe, "Darwin");
        assert!(!facts.has_infiniband);
        assert_eq!(facts.infiniband_num_devices, None);
        assert!(system.runs.borrow().is_empty());
        assert!(system.reads.borrow().is_empty());
    }

    #[test]
    fn test_no_infiniband_gives_nulls() {
        let system = FakeSystem::new().with_tool("ibstat");
        let config = ProbeConfig::default();
        let probe = InfinibandProbe::new(&system, &config);

        let facts = collect_facts_for_kernel(&probe, "Linux");
        assert!(!facts.has_infiniband);
        assert_eq!(facts.infiniband_hca_port_guids, None);
        assert_eq!(facts.infiniband_board_id, None);
        assert!(!system.ran("ibstat"));
    }

    #[test]
    fn test_port_guids_null_when_no_ports() {
        let system = FakeSystem::new()
            .with_tool("ibstat")
            .with_file(format!("{ROOT}/mlx5_0/board_id"), "MT_0000000223\n")
            .with_file(format!("{ROOT}/mlx5_2/board_id"), "MT_0000000224\n");
        let config = ProbeConfig::default();
        let probe = InfinibandProbe::new(&system, &config);

        let facts = collect_facts_for_kernel(&probe, "Linux");
        assert!(facts.has_infiniband);
        assert_eq!(facts.infiniband_num_devices, Some(0));
        assert_eq!(facts.infiniband_hca_port_guids, None);
        assert_eq!(facts.infiniband_fw_version, None);
    }

    #[test]
    fn test_unknown_port_board_id_is_null() {
        let system = FakeSystem::new().with_dir(format!("{ROOT}/foo"));
        let config = ProbeConfig::default();
        let probe = InfinibandProbe::new(&system, &config);

        let facts = collect_facts_for_kernel(&probe, "Linux");
        assert_eq!(facts.infiniband_board_id, None);
        assert_eq!(facts.infiniband_port_fw_versions, None);
    }

    #[test]
    fn test_fact_value_lookup() {
        let system = dual_hca_system();
        let config = ProbeConfig::default();
        let probe = InfinibandProbe::new(&system, &config);
        let facts = collect_facts_for_kernel(&probe, "Linux");

        assert_eq!(fact_value(&facts, "infiniband_num_devices"), Some(json!(2)));
        assert_eq!(fact_value(&facts, "infiniband_devices").map(|v| v.is_array()), Some(true));
        assert_eq!(fact_value(&facts, "collected_at"), None);
        assert_eq!(fact_value(&facts, "no_such_fact"), None);
    }

    #[test]
    fn test_null_facts_serialize_as_null() {
        let system = FakeSystem::new();
        let config = ProbeConfig::default();
        let probe = InfinibandProbe::new(&system, &config);
        let facts = collect_facts_for_kernel(&probe, "Linux");

        assert_eq!(fact_value(&facts, "infiniband_fw_version"), Some(json!(null)));
    }
}
