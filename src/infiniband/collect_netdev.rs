use std::collections::BTreeMap;

use tracing::debug;

use crate::infiniband::probe::InfinibandProbe;
use crate::infiniband::types::NetdevRecord;

// ibdev2netdev line: "<hca> port <n> ==> <netdev> (<Up|Down>)"
const HCA_FIELD: usize = 0;
const PORT_FIELD: usize = 2;
const NETDEV_FIELD: usize = 4;

/// HCA, port and netdev taken from one ibdev2netdev line.
#[derive(Debug, PartialEq)]
pub struct NetdevLine<'a> {
    pub hca: &'a str,
    pub port: &'a str,
    pub netdev: &'a str,
}

impl InfinibandProbe<'_> {
    /// Kernel network interfaces backed by an HCA port, with the port's
    /// live state, rate and link layer.
    pub fn netdev_to_hca_port(&self) -> BTreeMap<String, NetdevRecord> {
        let mut netdevs = BTreeMap::new();

        let ibdev2netdev = &self.config.tools.ibdev2netdev;
        let output = match self.run_tool(ibdev2netdev, &[]) {
            Some(o) if !o.trim().is_empty() => o,
            _ => return netdevs,
        };

        for line in output.lines() {
            let Some(parsed) = parse_netdev_line(line) else {
                if !line.trim().is_empty() {
                    debug!(line, "skipping malformed ibdev2netdev line");
                }
                continue;
            };

            netdevs.insert(
                parsed.netdev.to_string(),
                NetdevRecord {
                    hca: parsed.hca.to_string(),
                    port: parsed.port.to_string(),
                    state: self.real_port_state(parsed.hca, parsed.port),
                    rate: self.real_port_rate(parsed.hca, parsed.port),
                    link_layer: self.real_port_link_layer(parsed.hca, parsed.port),
                },
            );
        }

        netdevs
    }
}

/// `None` for lines with fewer than five fields.
pub fn parse_netdev_line(line: &str) -> Option<NetdevLine<'_>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() <= NETDEV_FIELD {
        return None;
    }
    Some(NetdevLine {
        hca: fields[HCA_FIELD],
        port: fields[PORT_FIELD],
        netdev: fields[NETDEV_FIELD],
    })
}
