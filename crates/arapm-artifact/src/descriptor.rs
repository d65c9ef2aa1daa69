//! `arapp.json` package descriptor and `manifest.json` loading

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ArtifactError, DESCRIPTOR_NAME, MANIFEST_NAME};

/// A role declared by the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Human description, e.g. "Create new payments"
    pub name: String,
    /// Identifier constant name, e.g. "CREATE_PAYMENTS_ROLE"
    pub id: String,
    /// Descriptions of the role params, e.g. ["Token address"]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

/// One environment block of the descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `arapp.json` package descriptor. Unknown fields are preserved and
/// copied verbatim into the generated artifact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environments: BTreeMap<String, AppEnvironment>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `manifest.json` release metadata, passed through as-is
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AragonManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read and parse `arapp.json` from `dir`. Absence is a fatal
/// configuration error, raised before any build or upload work.
pub fn read_app_descriptor(dir: &Path) -> Result<AppDescriptor, ArtifactError> {
    let path = dir.join(DESCRIPTOR_NAME);
    if !path.exists() {
        return Err(ArtifactError::MissingDescriptor(dir.to_path_buf()));
    }
    let contents = fs::read_to_string(&path)?;
    serde_json::from_str(&contents).map_err(|source| ArtifactError::Json {
        file: path.display().to_string(),
        source,
    })
}

/// Read and parse `manifest.json` from `dir`
pub fn read_manifest(dir: &Path) -> Result<AragonManifest, ArtifactError> {
    let path = dir.join(MANIFEST_NAME);
    if !path.exists() {
        return Err(ArtifactError::MissingManifest(dir.to_path_buf()));
    }
    let contents = fs::read_to_string(&path)?;
    serde_json::from_str(&contents).map_err(|source| ArtifactError::Json {
        file: path.display().to_string(),
        source,
    })
}

/// Resolve the app's ENS name for a network, in a flexible manner:
/// an explicit per-network name wins, then the top-level default, then a
/// unanimous guess across environments; anything else is a configuration
/// error.
pub fn parse_app_name(
    descriptor: &AppDescriptor,
    network: Option<&str>,
) -> Result<String, ArtifactError> {
    let by_network: BTreeMap<&str, &str> = descriptor
        .environments
        .iter()
        .filter_map(|(env, block)| {
            block
                .app_name
                .as_deref()
                .map(|name| (env.as_str(), name))
        })
        .collect();

    if let Some(network) = network {
        if let Some(name) = by_network.get(network) {
            return Ok(name.to_string());
        }
    }

    if let Some(name) = &descriptor.app_name {
        return Ok(name.clone());
    }

    // Try to guess: if every environment agrees, that name is the name
    let names: Vec<&str> = by_network.values().copied().collect();
    if let Some(first) = names.first() {
        if names.iter().all(|name| name == first) {
            return Ok(first.to_string());
        }
    }

    Err(ArtifactError::MissingAppName {
        network: network.unwrap_or("development").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> AppDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn per_network_name_wins() {
        let descriptor = descriptor(
            r#"{
                "appName": "counter.aragonpm.eth",
                "environments": {
                    "rinkeby": { "appName": "counter.open.aragonpm.eth" }
                },
                "roles": []
            }"#,
        );
        assert_eq!(
            parse_app_name(&descriptor, Some("rinkeby")).unwrap(),
            "counter.open.aragonpm.eth"
        );
        assert_eq!(
            parse_app_name(&descriptor, Some("mainnet")).unwrap(),
            "counter.aragonpm.eth"
        );
    }

    #[test]
    fn unanimous_environments_are_guessed() {
        let descriptor = descriptor(
            r#"{
                "environments": {
                    "rinkeby": { "appName": "counter.aragonpm.eth" },
                    "mainnet": { "appName": "counter.aragonpm.eth" }
                },
                "roles": []
            }"#,
        );
        assert_eq!(
            parse_app_name(&descriptor, None).unwrap(),
            "counter.aragonpm.eth"
        );
    }

    #[test]
    fn ambiguous_environments_are_an_error() {
        let descriptor = descriptor(
            r#"{
                "environments": {
                    "rinkeby": { "appName": "a.aragonpm.eth" },
                    "mainnet": { "appName": "b.aragonpm.eth" }
                },
                "roles": []
            }"#,
        );
        assert!(matches!(
            parse_app_name(&descriptor, Some("ropsten")),
            Err(ArtifactError::MissingAppName { .. })
        ));
    }

    #[test]
    fn no_name_anywhere_is_an_error() {
        let descriptor = descriptor(r#"{ "roles": [] }"#);
        assert!(matches!(
            parse_app_name(&descriptor, None),
            Err(ArtifactError::MissingAppName { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let descriptor = descriptor(
            r#"{
                "appName": "counter.aragonpm.eth",
                "roles": [],
                "path": "contracts/Counter.sol",
                "dependencies": [{ "appName": "vault.aragonpm.eth" }]
            }"#,
        );
        assert!(descriptor.extra.contains_key("path"));
        assert!(descriptor.extra.contains_key("dependencies"));
        let round_trip = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(round_trip["path"], "contracts/Counter.sol");
    }

    #[test]
    fn missing_descriptor_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_app_descriptor(dir.path()),
            Err(ArtifactError::MissingDescriptor(_))
        ));
    }

    #[test]
    fn descriptor_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DESCRIPTOR_NAME),
            r#"{ "appName": "counter.aragonpm.eth", "roles": [] }"#,
        )
        .unwrap();
        let descriptor = read_app_descriptor(dir.path()).unwrap();
        assert_eq!(descriptor.app_name.as_deref(), Some("counter.aragonpm.eth"));
    }
}
