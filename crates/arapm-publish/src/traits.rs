//! Collaborator interfaces of the publish pipeline
//!
//! The pipeline drives a compiler, a content store and an aragonPM
//! registry without knowing their backends. Implementations wrap the
//! actual toolchain and network clients; tests plug in mocks.

use std::path::Path;

use arapm_artifact::AbiEntry;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::CollaboratorError;

/// A version already published to the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApmVersion {
    pub version: Version,
    pub contract_address: String,
    pub content_uri: String,
}

/// The unsigned registry transaction that records a new version.
/// Broadcasting it is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishTxData {
    /// Registry (or repo) contract the transaction targets
    pub to: String,
    /// Hex-encoded calldata
    pub data: String,
}

/// Everything the registry needs to record a version
#[derive(Debug, Clone, PartialEq)]
pub struct VersionInfo {
    pub version: Version,
    pub contract_address: String,
    pub content_uri: String,
}

pub trait Compiler {
    /// Flatten the app contract and its imports into a single source file
    fn flatten(&self) -> Result<String, CollaboratorError>;

    /// Compiled interface of the named contract
    fn abi(&self, contract: &str) -> Result<Vec<AbiEntry>, CollaboratorError>;
}

pub trait ContentStore {
    /// Upload a directory, skipping paths matching `ignore`, and return
    /// the content identifier
    fn upload_dir(&self, dir: &Path, ignore: &[String]) -> Result<String, CollaboratorError>;

    /// Pin already-uploaded content so it survives garbage collection
    fn pin(&self, cid: &str) -> Result<(), CollaboratorError>;
}

pub trait Registry {
    /// Latest published version of `app`, `None` before the first release
    fn latest_version(&self, app: &str) -> Result<Option<ApmVersion>, CollaboratorError>;

    /// Build the unsigned transaction that publishes `info` for `app`
    fn publish_version_tx(
        &self,
        app: &str,
        info: &VersionInfo,
        manager: &str,
    ) -> Result<PublishTxData, CollaboratorError>;
}
