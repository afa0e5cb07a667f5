use std::collections::BTreeMap;

use tracing::info;

use crate::cli::Commands;
use crate::error::FactsError;
use crate::infiniband::types::PortGuids;
use crate::infiniband::{collect_facts, fact_value, InfinibandProbe};
use crate::output::{output_data, print_success};

pub fn handle_facts_command(cmd: &Commands, probe: &InfinibandProbe) -> Result<(), FactsError> {
    match cmd {
        Commands::Facts { format } => {
            let facts = collect_facts(probe);
            output_data(&facts, format)?;
        }
        Commands::Fact { name, format } => {
            let facts = collect_facts(probe);
            let value = fact_value(&facts, name).ok_or_else(|| FactsError::UnknownFact(name.clone()))?;
            output_data(&value, format)?;
        }
        Commands::Devices { format } => {
            output_data(&probe.pci_devices(), format)?;
        }
        Commands::Hcas { format } => {
            output_data(&probe.hcas(), format)?;
        }
        Commands::Firmware { format } => {
            output_data(&probe.device_firmware(), format)?;
        }
        Commands::PortGuids { hca, format } => {
            let hcas = match hca {
                Some(hca) => vec![hca.clone()],
                None => probe.hcas(),
            };
            let guids: BTreeMap<String, PortGuids> = hcas
                .into_iter()
                .map(|hca| {
                    let guids = probe.hca_port_guids(&hca);
                    (hca, guids)
                })
                .collect();
            output_data(&guids, format)?;
        }
        Commands::Netdevs { format } => {
            output_data(&probe.netdev_to_hca_port(), format)?;
        }
        Commands::Post { url } => {
            let facts = collect_facts(probe);

            let api_url = format!("{}/api/v1/facts/infiniband", url.trim_end_matches('/'));
            info!(url = %api_url, "posting InfiniBand facts");

            let client = reqwest::blocking::Client::new();
            let response = client.post(&api_url).json(&facts).send()?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text()?;
                return Err(FactsError::PostRejected {
                    status: status.as_u16(),
                    body,
                });
            }
            print_success(&format!("Posted InfiniBand facts to {}", api_url));
        }
    }
    Ok(())
}
