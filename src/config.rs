use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FactsError;

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/infiniband";

const CONFIG_DIR: &str = "infiniband-facts";
const CONFIG_FILE: &str = "config.yaml";

/// Where the probes look and which tools they call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub sysfs_root: PathBuf,
    pub tools: ToolNames,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolNames {
    pub lspci: String,
    pub mstflint: String,
    pub ibstat: String,
    pub ibdev2netdev: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            tools: ToolNames::default(),
        }
    }
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            lspci: "lspci".to_string(),
            mstflint: "mstflint".to_string(),
            ibstat: "ibstat".to_string(),
            ibdev2netdev: "ibdev2netdev".to_string(),
        }
    }
}

/// `$XDG_CONFIG_HOME/infiniband-facts/config.yaml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Loads the config from an explicit path (must exist) or from the default
/// location (optional).
pub fn load_config(explicit: Option<&Path>) -> Result<ProbeConfig, FactsError> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(ProbeConfig::default())
            }
        },
    }
}

fn read_config(path: &Path) -> Result<ProbeConfig, FactsError> {
    debug!(path = %path.display(), "loading config");
    let text = fs::read_to_string(path).map_err(|source| FactsError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text).map_err(|source| FactsError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(text: &str) -> Result<ProbeConfig, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(ProbeConfig::default());
    }
    serde_yaml::from_str(text)
}
