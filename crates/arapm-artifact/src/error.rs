//! Error types for artifact assembly

use std::io;
use std::path::PathBuf;

use arapm_extract::ExtractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("no arapp.json found in {0}")]
    MissingDescriptor(PathBuf),

    #[error("no manifest.json found in {0}")]
    MissingManifest(PathBuf),

    #[error(
        "no appName configured for network {network}; add an 'appName' property \
         to arapp.json (top-level or under environments.{network})"
    )]
    MissingAppName { network: String },

    #[error("missing release file: {0}")]
    MissingReleaseFile(PathBuf),

    #[error("invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
