//! Compiled-interface (ABI) entry types and signature derivation

use serde::{Deserialize, Serialize};

/// One entry of a compiled contract interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<AbiParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<AbiParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<AbiParam>>,
}

impl AbiEntry {
    pub fn is_function(&self) -> bool {
        self.kind == "function"
    }

    /// Canonical `name(type,type,...)` signature, the join key against
    /// extracted functions. `None` for unnamed entries (constructor,
    /// fallback, events are keyed by their own names).
    pub fn signature(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let inputs = self
            .inputs
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|param| param.kind.clone())
            .collect::<Vec<_>>()
            .join(",");
        Some(format!("{}({})", name, inputs))
    }
}

/// The fixed stand-in ABI record for a fallback function the compiled
/// interface does not list
pub fn fallback_abi_entry() -> AbiEntry {
    AbiEntry {
        kind: "fallback".to_string(),
        name: None,
        inputs: None,
        outputs: None,
        state_mutability: Some("payable".to_string()),
        payable: Some(true),
        constant: None,
        anonymous: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_of_function_entry() {
        let entry: AbiEntry = serde_json::from_str(
            r#"{
                "type": "function",
                "name": "transfer",
                "inputs": [
                    { "name": "_to", "type": "address" },
                    { "name": "_amount", "type": "uint256" }
                ],
                "outputs": [],
                "stateMutability": "nonpayable"
            }"#,
        )
        .unwrap();
        assert_eq!(entry.signature().as_deref(), Some("transfer(address,uint256)"));
    }

    #[test]
    fn unnamed_entries_have_no_signature() {
        let entry: AbiEntry =
            serde_json::from_str(r#"{ "type": "constructor", "inputs": [] }"#).unwrap();
        assert_eq!(entry.signature(), None);
    }
}
