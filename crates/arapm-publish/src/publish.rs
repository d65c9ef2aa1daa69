//! The sequential publish pipeline

use std::fs;
use std::path::{Path, PathBuf};

use arapm_artifact::{
    full_app_name, generate_artifact_from_source, parse_app_name, read_app_descriptor,
    read_manifest, validate_artifacts, write_artifacts,
};
use arapm_extract::contract_name_from_path;
use semver::Version;
use tracing::info;

use crate::{
    parse_bump_or_version, ApmVersion, Bump, Compiler, ContentStore, PublishError,
    PublishTxData, Registry, VersionInfo,
};

/// Contract address recorded for content-only releases
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// `major`/`minor`/`patch` or an explicit semver string
    pub bump_or_version: String,
    /// Address of an already-deployed contract for this version
    pub contract_address: Option<String>,
    /// Release frontend changes only, against the zero address
    pub only_content: bool,
    /// Environment to resolve the app name against
    pub network: Option<String>,
    /// Contract to extract from, overriding the descriptor's `path`
    pub contract: Option<String>,
    /// Address set as version manager in the registry transaction
    pub manager: String,
    pub dist_dir: PathBuf,
    pub has_frontend: bool,
    pub skip_validation: bool,
    /// Files holding newline-separated upload ignore patterns
    pub ignore_files: Vec<PathBuf>,
    pub pin_content: bool,
}

impl PublishOptions {
    pub fn new(bump_or_version: impl Into<String>) -> Self {
        Self {
            bump_or_version: bump_or_version.into(),
            contract_address: None,
            only_content: false,
            network: None,
            contract: None,
            manager: ZERO_ADDRESS.to_string(),
            dist_dir: PathBuf::from("dist"),
            has_frontend: false,
            skip_validation: false,
            ignore_files: Vec::new(),
            pin_content: false,
        }
    }
}

/// Everything a caller needs to review and broadcast the release
#[derive(Debug, Clone, PartialEq)]
pub struct PublishPreparation {
    pub tx_data: PublishTxData,
    pub version: Version,
    pub bump: Bump,
    pub contract_address: String,
    pub content_hash: String,
    pub content_uri: String,
}

/// Run the publish pipeline up to (not including) broadcasting the
/// registry transaction.
///
/// Stages run strictly in order and the first failure aborts the run;
/// configuration problems surface before any compile or upload work.
pub fn publish(
    options: &PublishOptions,
    descriptor_dir: &Path,
    compiler: &dyn Compiler,
    store: &dyn ContentStore,
    registry: &dyn Registry,
) -> Result<PublishPreparation, PublishError> {
    let descriptor = read_app_descriptor(descriptor_dir)?;
    let manifest = read_manifest(descriptor_dir)?;
    let app_name = parse_app_name(&descriptor, options.network.as_deref())?;
    let full_name = full_app_name(&app_name);
    info!(app = %full_name, "publishing");

    let prev = registry
        .latest_version(&full_name)
        .map_err(PublishError::stage("registry lookup"))?;
    let (version, bump) = parse_bump_or_version(
        &options.bump_or_version,
        prev.as_ref().map(|p| &p.version),
    )?;
    let contract_address = resolve_contract_address(options, bump, &version, prev.as_ref())?;
    info!(%version, %bump, address = %contract_address, "version resolved");

    let contract = options
        .contract
        .clone()
        .or_else(|| descriptor_contract_path(&descriptor))
        .ok_or(PublishError::MissingContractPath)?;
    let contract_name = contract_name_from_path(&contract);

    let flat_code = compiler
        .flatten()
        .map_err(PublishError::stage("contract flattening"))?;
    let abi = compiler
        .abi(&contract_name)
        .map_err(PublishError::stage("interface extraction"))?;
    info!(contract = %contract_name, "compiled");

    let artifact =
        generate_artifact_from_source(&full_name, &abi, &flat_code, &contract, &descriptor)?;
    write_artifacts(&options.dist_dir, &artifact, &manifest, &flat_code)?;
    if !options.skip_validation {
        validate_artifacts(&options.dist_dir, options.has_frontend)?;
    }

    let ignore = read_ignore_patterns(&options.ignore_files)?;
    let content_hash = store
        .upload_dir(&options.dist_dir, &ignore)
        .map_err(PublishError::stage("content upload"))?;
    if options.pin_content {
        store
            .pin(&content_hash)
            .map_err(PublishError::stage("content pin"))?;
    }
    let content_uri = format!("ipfs:{content_hash}");
    info!(%content_uri, "content uploaded");

    let tx_data = registry
        .publish_version_tx(
            &full_name,
            &VersionInfo {
                version: version.clone(),
                contract_address: contract_address.clone(),
                content_uri: content_uri.clone(),
            },
            &options.manager,
        )
        .map_err(PublishError::stage("registry transaction"))?;

    Ok(PublishPreparation {
        tx_data,
        version,
        bump,
        contract_address,
        content_hash,
        content_uri,
    })
}

/// Address the new version points at. Deployment is out of scope, so a
/// major bump must bring its own address; minor and patch releases reuse
/// the previous one.
fn resolve_contract_address(
    options: &PublishOptions,
    bump: Bump,
    version: &Version,
    prev: Option<&ApmVersion>,
) -> Result<String, PublishError> {
    if options.only_content {
        return Ok(ZERO_ADDRESS.to_string());
    }
    if let Some(address) = &options.contract_address {
        return Ok(address.clone());
    }
    match prev {
        Some(prev) if bump != Bump::Major => Ok(prev.contract_address.clone()),
        _ => Err(PublishError::MissingContractAddress {
            version: version.clone(),
        }),
    }
}

/// `path` field of the descriptor, pass-through like the rest of its
/// unknown fields
fn descriptor_contract_path(descriptor: &arapm_artifact::AppDescriptor) -> Option<String> {
    descriptor
        .extra
        .get("path")
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

/// Collect upload ignore patterns from newline-separated files, skipping
/// blanks and `#` comments
pub fn read_ignore_patterns(files: &[PathBuf]) -> Result<Vec<String>, PublishError> {
    let mut patterns = Vec::new();
    for path in files {
        let contents = fs::read_to_string(path).map_err(|source| PublishError::IgnoreFile {
            path: path.clone(),
            source,
        })?;
        patterns.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn only_content_releases_use_the_zero_address() {
        let mut options = PublishOptions::new("minor");
        options.only_content = true;
        let address =
            resolve_contract_address(&options, Bump::Minor, &Version::new(1, 1, 0), None)
                .unwrap();
        assert_eq!(address, ZERO_ADDRESS);
    }

    #[test]
    fn explicit_address_wins() {
        let mut options = PublishOptions::new("major");
        options.contract_address = Some("0xabc".to_string());
        let address =
            resolve_contract_address(&options, Bump::Major, &Version::new(2, 0, 0), None)
                .unwrap();
        assert_eq!(address, "0xabc");
    }

    #[test]
    fn minor_bump_reuses_previous_address() {
        let prev = ApmVersion {
            version: Version::new(1, 0, 0),
            contract_address: "0xdef".to_string(),
            content_uri: "ipfs:Qm1".to_string(),
        };
        let options = PublishOptions::new("minor");
        let address =
            resolve_contract_address(&options, Bump::Minor, &Version::new(1, 1, 0), Some(&prev))
                .unwrap();
        assert_eq!(address, "0xdef");
    }

    #[test]
    fn major_bump_without_address_fails() {
        let prev = ApmVersion {
            version: Version::new(1, 0, 0),
            contract_address: "0xdef".to_string(),
            content_uri: "ipfs:Qm1".to_string(),
        };
        let options = PublishOptions::new("major");
        let err =
            resolve_contract_address(&options, Bump::Major, &Version::new(2, 0, 0), Some(&prev))
                .unwrap_err();
        assert!(matches!(err, PublishError::MissingContractAddress { .. }));
    }

    #[test]
    fn first_release_without_address_fails_for_any_bump() {
        let options = PublishOptions::new("patch");
        let err =
            resolve_contract_address(&options, Bump::Patch, &Version::new(0, 0, 1), None)
                .unwrap_err();
        assert!(matches!(err, PublishError::MissingContractAddress { .. }));
        // The message must fit this path too, not just major bumps
        let message = err.to_string();
        assert!(message.contains("0.0.1"), "unexpected message: {message}");
        assert!(!message.contains("major bump"), "unexpected message: {message}");
    }

    #[test]
    fn ignore_patterns_skip_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "node_modules").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# build leftovers").unwrap();
        writeln!(file, "  *.log  ").unwrap();
        let patterns = read_ignore_patterns(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(patterns, vec!["node_modules", "*.log"]);
    }

    #[test]
    fn missing_ignore_file_is_reported() {
        let err =
            read_ignore_patterns(&[PathBuf::from("/definitely/not/here")]).unwrap_err();
        assert!(matches!(err, PublishError::IgnoreFile { .. }));
    }
}
