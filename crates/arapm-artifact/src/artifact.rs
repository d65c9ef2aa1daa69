//! Release artifact assembly

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use arapm_extract::{parse_contract_functions, ContractFunction, ExtractOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    app_id, fallback_abi_entry, keccak_hex, AbiEntry, AppDescriptor, AragonManifest,
    ArtifactError, Role, ARTIFACT_NAME, FLAT_CODE_NAME, MANIFEST_NAME,
};

/// Relative path the flattened code is published under, referenced from
/// the artifact
pub const FLAT_CODE_PATH: &str = "./code.sol";

/// One function entry of the artifact: extraction output joined with its
/// ABI record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFunction {
    pub roles: Vec<String>,
    /// `null` when no notice was found
    pub notice: Option<String>,
    /// `null` when the compiled interface has no entry for this signature;
    /// tolerated here and surfaced to validation
    pub abi: Option<AbiEntry>,
    pub sig: String,
}

/// A declared role with its derived identifier hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleWithBytes {
    pub name: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    pub bytes: String,
}

/// The assembled `artifact.json` manifest: a superset of the package
/// descriptor plus the joined function/role/interface metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AragonArtifact {
    /// Descriptor fields copied through verbatim (environments, path,
    /// dependencies, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub functions: Vec<ArtifactFunction>,
    /// Functions no longer available at this version; reserved, always
    /// empty for now
    pub deprecated_functions: BTreeMap<String, Vec<ArtifactFunction>>,
    pub roles: Vec<RoleWithBytes>,
    pub abi: Vec<AbiEntry>,
    pub flattened_code: String,
    pub app_id: String,
    pub app_name: String,
}

/// Assemble the release artifact from already-extracted functions
pub fn generate_artifact(
    app_name: &str,
    abi: &[AbiEntry],
    functions: &[ContractFunction],
    descriptor: &AppDescriptor,
) -> AragonArtifact {
    let abi_by_signature: HashMap<String, &AbiEntry> = abi
        .iter()
        .filter(|entry| entry.is_function())
        .filter_map(|entry| entry.signature().map(|sig| (sig, entry)))
        .collect();

    let functions = functions
        .iter()
        .map(|function| {
            let abi = match abi_by_signature.get(&function.sig) {
                Some(entry) => Some((*entry).clone()),
                None if function.sig == "fallback()" => Some(fallback_abi_entry()),
                None => None,
            };
            ArtifactFunction {
                roles: function.roles.iter().map(|role| role.id.clone()).collect(),
                notice: function.notice.clone(),
                abi,
                sig: function.sig.clone(),
            }
        })
        .collect();

    AragonArtifact {
        extra: descriptor_passthrough(descriptor),
        functions,
        deprecated_functions: BTreeMap::new(),
        roles: descriptor.roles.iter().map(role_with_bytes).collect(),
        abi: abi.to_vec(),
        flattened_code: FLAT_CODE_PATH.to_string(),
        app_id: app_id(app_name),
        app_name: app_name.to_string(),
    }
}

/// Assemble the release artifact from raw flattened source, extracting
/// functions first
pub fn generate_artifact_from_source(
    app_name: &str,
    abi: &[AbiEntry],
    flat_code: &str,
    contract_name: &str,
    descriptor: &AppDescriptor,
) -> Result<AragonArtifact, ArtifactError> {
    let functions =
        parse_contract_functions(flat_code, contract_name, ExtractOptions::default())?;
    Ok(generate_artifact(app_name, abi, &functions, descriptor))
}

/// Descriptor fields other than `appName` and `roles` (both replaced by
/// derived artifact fields), rendered for pass-through
fn descriptor_passthrough(descriptor: &AppDescriptor) -> Map<String, Value> {
    let mut extra = descriptor.extra.clone();
    if !descriptor.environments.is_empty() {
        let environments: Map<String, Value> = descriptor
            .environments
            .iter()
            .map(|(network, env)| {
                let mut obj = Map::new();
                if let Some(app_name) = &env.app_name {
                    obj.insert("appName".to_string(), Value::String(app_name.clone()));
                }
                if let Some(net) = &env.network {
                    obj.insert("network".to_string(), Value::String(net.clone()));
                }
                obj.extend(env.extra.clone());
                (network.clone(), Value::Object(obj))
            })
            .collect();
        extra.insert("environments".to_string(), Value::Object(environments));
    }
    extra
}

fn role_with_bytes(role: &Role) -> RoleWithBytes {
    RoleWithBytes {
        name: role.name.clone(),
        id: role.id.clone(),
        params: role.params.clone(),
        bytes: keccak_hex(&role.id),
    }
}

/// Write the three release files (`artifact.json`, `manifest.json`,
/// `code.sol`) into `out_dir`, creating it if needed
pub fn write_artifacts(
    out_dir: &Path,
    artifact: &AragonArtifact,
    manifest: &AragonManifest,
    flat_code: &str,
) -> Result<(), ArtifactError> {
    fs::create_dir_all(out_dir)?;
    let artifact_json =
        serde_json::to_string_pretty(artifact).map_err(|source| ArtifactError::Json {
            file: ARTIFACT_NAME.to_string(),
            source,
        })?;
    let manifest_json =
        serde_json::to_string_pretty(manifest).map_err(|source| ArtifactError::Json {
            file: MANIFEST_NAME.to_string(),
            source,
        })?;
    fs::write(out_dir.join(ARTIFACT_NAME), artifact_json)?;
    fs::write(out_dir.join(MANIFEST_NAME), manifest_json)?;
    fs::write(out_dir.join(FLAT_CODE_NAME), flat_code)?;
    info!(dir = %out_dir.display(), "release files written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arapm_extract::RoleUsage;

    fn sample_descriptor() -> AppDescriptor {
        serde_json::from_str(
            r#"{
                "appName": "finance.aragonpm.eth",
                "roles": [
                    { "name": "Create payments", "id": "CREATE_PAYMENTS_ROLE", "params": ["Token"] }
                ],
                "path": "contracts/Finance.sol"
            }"#,
        )
        .unwrap()
    }

    fn sample_abi() -> Vec<AbiEntry> {
        serde_json::from_str(
            r#"[
                {
                    "type": "function",
                    "name": "newPayment",
                    "inputs": [
                        { "name": "_token", "type": "address" },
                        { "name": "_amount", "type": "uint256" }
                    ],
                    "outputs": [],
                    "stateMutability": "nonpayable"
                },
                {
                    "type": "event",
                    "name": "NewPayment",
                    "inputs": [],
                    "anonymous": false
                }
            ]"#,
        )
        .unwrap()
    }

    fn sample_functions() -> Vec<ContractFunction> {
        vec![
            ContractFunction {
                name: "newPayment".to_string(),
                sig: "newPayment(address,uint256)".to_string(),
                roles: vec![RoleUsage {
                    id: "CREATE_PAYMENTS_ROLE".to_string(),
                    param_count: 2,
                }],
                notice: Some("Create a new payment".to_string()),
            },
            ContractFunction {
                name: String::new(),
                sig: "fallback()".to_string(),
                roles: vec![],
                notice: None,
            },
            ContractFunction {
                name: "unmatched".to_string(),
                sig: "unmatched(uint8)".to_string(),
                roles: vec![],
                notice: None,
            },
        ]
    }

    #[test]
    fn functions_join_abi_by_signature() {
        let artifact = generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        );
        let joined = &artifact.functions[0];
        assert_eq!(joined.sig, "newPayment(address,uint256)");
        assert_eq!(joined.roles, vec!["CREATE_PAYMENTS_ROLE"]);
        assert_eq!(
            joined.abi.as_ref().and_then(|abi| abi.name.as_deref()),
            Some("newPayment")
        );
    }

    #[test]
    fn fallback_gets_the_stand_in_abi() {
        let artifact = generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        );
        let fallback = &artifact.functions[1];
        assert_eq!(
            fallback.abi.as_ref().map(|abi| abi.kind.as_str()),
            Some("fallback")
        );
        assert_eq!(fallback.abi.as_ref().unwrap().payable, Some(true));
    }

    #[test]
    fn unmatched_function_has_null_abi() {
        let artifact = generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        );
        assert_eq!(artifact.functions[2].abi, None);
        // Serialized as an explicit null, not omitted
        let json = serde_json::to_value(&artifact).unwrap();
        assert!(json["functions"][2]["abi"].is_null());
    }

    #[test]
    fn signatures_round_trip_in_order() {
        let functions = sample_functions();
        let artifact = generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &functions,
            &sample_descriptor(),
        );
        let sigs: Vec<&str> = artifact.functions.iter().map(|f| f.sig.as_str()).collect();
        let expected: Vec<&str> = functions.iter().map(|f| f.sig.as_str()).collect();
        assert_eq!(sigs, expected);
    }

    #[test]
    fn roles_carry_keccak_bytes() {
        let artifact = generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        );
        let role = &artifact.roles[0];
        assert_eq!(role.id, "CREATE_PAYMENTS_ROLE");
        assert_eq!(role.bytes, keccak_hex("CREATE_PAYMENTS_ROLE"));
        assert!(role.bytes.starts_with("0x"));
        assert_eq!(role.bytes.len(), 66);
    }

    #[test]
    fn descriptor_fields_pass_through() {
        let artifact = generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        );
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["path"], "contracts/Finance.sol");
        assert_eq!(json["flattenedCode"], "./code.sol");
        assert_eq!(json["appName"], "finance.aragonpm.eth");
        assert!(json["appId"].as_str().unwrap().starts_with("0x"));
        assert_eq!(json["deprecatedFunctions"], serde_json::json!({}));
    }

    #[test]
    fn artifact_serialization_is_deterministic() {
        let first = serde_json::to_string(&generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        ))
        .unwrap();
        let second = serde_json::to_string(&generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        ))
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn from_source_runs_extraction() {
        let source = r#"
            contract Finance {
                function newPayment(address _token, uint256 _amount) external auth(CREATE_PAYMENTS_ROLE) {}
            }
        "#;
        let artifact = generate_artifact_from_source(
            "finance.aragonpm.eth",
            &sample_abi(),
            source,
            "Finance",
            &sample_descriptor(),
        )
        .unwrap();
        assert_eq!(artifact.functions[0].sig, "newPayment(address,uint256)");
        assert_eq!(artifact.functions[0].roles, vec!["CREATE_PAYMENTS_ROLE"]);
    }

    #[test]
    fn write_artifacts_creates_release_files() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = generate_artifact(
            "finance.aragonpm.eth",
            &sample_abi(),
            &sample_functions(),
            &sample_descriptor(),
        );
        write_artifacts(
            dir.path(),
            &artifact,
            &AragonManifest::default(),
            "contract Finance {}",
        )
        .unwrap();
        assert!(dir.path().join(ARTIFACT_NAME).exists());
        assert!(dir.path().join(MANIFEST_NAME).exists());
        assert!(dir.path().join(FLAT_CODE_NAME).exists());

        let written: AragonArtifact = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(ARTIFACT_NAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(written, artifact);
    }
}
