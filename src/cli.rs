use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "infiniband-facts")]
#[command(about = "Report InfiniBand hardware facts for configuration management")]
pub struct Cli {
    /// Config file (defaults to ~/.config/infiniband-facts/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log probe decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every InfiniBand fact
    Facts {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Resolve a single fact by name
    Fact {
        /// Fact name, e.g. infiniband_fw_version
        name: String,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// List InfiniBand PCI functions found by lspci
    Devices {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// List HCAs under the InfiniBand sysfs class directory
    Hcas {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Firmware versions per PCI device from mstflint
    Firmware {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Port GUIDs from ibstat
    PortGuids {
        /// Only this HCA (all HCAs when omitted)
        #[arg(long)]
        hca: Option<String>,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Network interfaces mapped to HCA ports by ibdev2netdev
    Netdevs {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Post the fact set to an inventory API
    Post {
        /// Inventory API base URL
        #[arg(short, long, default_value = "http://localhost:6183")]
        url: String,
    },
}
