use crate::infiniband::probe::InfinibandProbe;
use crate::infiniband::types::PortGuids;

impl InfinibandProbe<'_> {
    /// Port GUIDs of one HCA from `ibstat -p <hca>`, keyed "1", "2", ...
    pub fn hca_port_guids(&self, hca: &str) -> PortGuids {
        let ibstat = &self.config.tools.ibstat;
        match self.run_tool(ibstat, &["-p", hca]) {
            Some(output) => parse_port_guids(&output),
            None => PortGuids::new(),
        }
    }
}

/// One GUID per line. Lines are not validated, so a blank line still takes
/// a port number.
pub fn parse_port_guids(output: &str) -> PortGuids {
    output
        .lines()
        .enumerate()
        .map(|(index, line)| ((index + 1).to_string(), line.trim().to_string()))
        .collect()
}
