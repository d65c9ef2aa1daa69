use std::path::PathBuf;

use arapm_artifact::ArtifactError;
use semver::Version;
use thiserror::Error;

/// Failure reported by a collaborator implementation (compiler, content
/// store, registry). Carries whatever message the backend produced.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("invalid version or bump `{input}`: {reason}")]
    InvalidBump { input: String, reason: String },

    #[error(
        "version {version} needs a contract address: a previous address is only \
         reused for minor and patch bumps; pass one explicitly or release content only"
    )]
    MissingContractAddress { version: Version },

    #[error("no contract path in arapp.json and none given on the command line")]
    MissingContractPath,

    #[error("{stage}: {source}")]
    Collaborator {
        stage: &'static str,
        source: CollaboratorError,
    },

    #[error("cannot read ignore file {path}: {source}")]
    IgnoreFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PublishError {
    pub(crate) fn stage(stage: &'static str) -> impl FnOnce(CollaboratorError) -> Self {
        move |source| Self::Collaborator { stage, source }
    }
}
