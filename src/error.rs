use std::path::PathBuf;

use thiserror::Error;

/// Failures of the CLI surface. Probes themselves never fail; they report
/// absence as `None` or an empty collection.
#[derive(Debug, Error)]
pub enum FactsError {
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("unknown fact '{0}'")]
    UnknownFact(String),

    #[error("failed to serialize JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to post facts: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to post facts: HTTP {status}: {body}")]
    PostRejected { status: u16, body: String },
}
