//! Function and role extraction from a parsed source unit
//!
//! Mirrors the conventions of Aragon app contracts: roles are attached
//! through exactly two modifiers,
//! - `modifier auth(bytes32 _role)`
//! - `modifier authP(bytes32 _role, uint256[] _params)`
//!
//! and a role's parameter list is only trusted when it is built by an
//! internal pure helper returning `uint256[]` (conventionally `arr(...)`).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use arapm_ast::{
    ContractDefinition, ContractKind, FunctionDefinition, ModifierArg, ModifierInvocation,
    SourceUnit, StateMutability, TypeName, Visibility,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::notices::parse_function_notices;
use crate::ExtractError;

/// An externally callable, state-modifying function and its roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFunction {
    /// Empty for the fallback function
    pub name: String,
    /// Canonical `name(type,type,...)` signature, or the literal
    /// `fallback()`
    pub sig: String,
    pub roles: Vec<RoleUsage>,
    /// `None` when no notice was found; `Some("")` when the author wrote
    /// an empty one
    pub notice: Option<String>,
}

/// One `auth`/`authP` modifier attached to a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUsage {
    /// Empty when the first modifier argument is not a plain identifier
    pub id: String,
    pub param_count: usize,
}

/// Options for [`parse_contract_functions`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Only include functions declared directly on the target contract,
    /// ignoring inherited bases
    pub only_target_contract: bool,
}

/// Parse all external/public state-modifying functions of `target_contract`
/// and its transitive bases out of `source`.
///
/// `target_contract` may be a bare name (`"Finance"`) or a path-like string
/// (`"contracts/Finance.sol"`); when no contract with that name exists the
/// walk starts from the last contract in the file, which is where flattened
/// output conventionally places the target.
pub fn parse_contract_functions(
    source: &str,
    target_contract: &str,
    options: ExtractOptions,
) -> Result<Vec<ContractFunction>, ExtractError> {
    let unit = arapm_parser::parse(source)?;
    let target_name = contract_name_from_path(target_contract);

    // Aggregate valid auth helper functions first so role param counts can
    // be read off their call sites
    let auth_helpers = collect_auth_helpers(&unit);

    // Only contract-kind definitions take part in target/base resolution;
    // interfaces and libraries cannot carry app entry points. Duplicate
    // names resolve to the last definition, without conflict detection.
    let contracts: Vec<&ContractDefinition> = unit
        .definitions()
        .filter(|def| def.kind == ContractKind::Contract)
        .collect();
    let mut by_name: HashMap<&str, &ContractDefinition> = HashMap::new();
    for contract in &contracts {
        by_name.insert(contract.name.as_str(), contract);
    }

    let start = match by_name.get(target_name.as_str()) {
        Some(contract) if !target_name.is_empty() => *contract,
        _ => {
            let last = *contracts.last().ok_or(ExtractError::NoContracts)?;
            if !target_name.is_empty() {
                warn!(
                    target = %target_name,
                    fallback = %last.name,
                    "target contract not found in source, starting from the last contract"
                );
            }
            last
        }
    };

    let mut functions = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    walk_contract(
        start,
        &by_name,
        &auth_helpers,
        options.only_target_contract,
        &mut visited,
        &mut functions,
    );

    // The declaration-level parser drops comments, so notices are scanned
    // separately from the raw source and joined by guessed signature
    let notices = parse_function_notices(source);
    let mut by_signature: HashMap<String, String> = HashMap::new();
    for record in notices {
        // Last-seen record wins on repeated signatures
        by_signature.insert(record.signature, record.notice);
    }
    for function in &mut functions {
        if function.notice.is_none() {
            function.notice = by_signature.get(&function.sig).cloned();
        }
    }

    Ok(functions)
}

/// Append `contract`'s qualifying functions, then recurse into its bases
/// depth-first. The visited set marks each contract before its bases are
/// entered, which bounds the walk on cyclic or diamond inheritance; it does
/// not de-duplicate function output beyond that.
fn walk_contract(
    contract: &ContractDefinition,
    by_name: &HashMap<&str, &ContractDefinition>,
    auth_helpers: &HashSet<String>,
    only_target: bool,
    visited: &mut HashSet<String>,
    out: &mut Vec<ContractFunction>,
) {
    for function in contract.functions() {
        if function.is_constructor {
            continue;
        }
        // Only externally callable, state-modifying functions qualify
        if matches!(
            function.visibility,
            Some(Visibility::Internal) | Some(Visibility::Private)
        ) {
            continue;
        }
        if matches!(
            function.mutability,
            Some(StateMutability::View)
                | Some(StateMutability::Pure)
                | Some(StateMutability::Constant)
        ) {
            continue;
        }

        out.push(ContractFunction {
            name: function.name.clone().unwrap_or_default(),
            sig: function_signature(function),
            roles: function
                .modifiers
                .iter()
                .filter(|m| m.name == "auth" || m.name == "authP")
                .map(|m| role_usage(m, auth_helpers))
                .collect(),
            notice: None,
        });
    }

    for base in &contract.bases {
        if !visited.contains(base.as_str()) {
            visited.insert(contract.name.clone());
            if let Some(base_contract) = by_name.get(base.as_str()) {
                if !only_target {
                    walk_contract(
                        base_contract,
                        by_name,
                        auth_helpers,
                        only_target,
                        visited,
                        out,
                    );
                }
            } else {
                warn!(base = %base, contract = %contract.name, "base contract not found in source, skipping");
            }
        }
    }
}

/// Canonical `name(type,type,...)` signature used to join a parsed
/// function with its ABI entry
pub fn function_signature(function: &FunctionDefinition) -> String {
    match &function.name {
        Some(name) => {
            let types: Vec<String> = function
                .params
                .iter()
                .map(|param| canonical_type(&param.type_name))
                .collect();
            format!("{}({})", name, types.join(","))
        }
        None => "fallback()".to_string(),
    }
}

/// Canonical ABI type of a parameter. User-defined types (structs, enums,
/// contract references) are rendered as `address`, the legacy Aragon
/// convention; this is a known approximation, not a universal truth.
fn canonical_type(type_name: &TypeName) -> String {
    match type_name {
        TypeName::Elementary(name) => name.clone(),
        TypeName::Array { base, length } => {
            let base = match base.as_ref() {
                TypeName::Elementary(name) => name.clone(),
                _ => "address".to_string(),
            };
            match length {
                Some(n) => format!("{}[{}]", base, n),
                None => format!("{}[]", base),
            }
        }
        TypeName::UserDefined(_) | TypeName::Opaque => "address".to_string(),
    }
}

/// Role id and param count for a single `auth`/`authP` invocation
fn role_usage(modifier: &ModifierInvocation, auth_helpers: &HashSet<String>) -> RoleUsage {
    let id = match modifier.args.first() {
        // Common usage with a pre-defined constant:
        //   bytes32 constant TRANSFER_ROLE = keccak256("TRANSFER_ROLE");
        //   auth(TRANSFER_ROLE)
        Some(ModifierArg::Identifier(name)) => name.clone(),
        // Unknown parsing state
        _ => String::new(),
    };

    let param_count = match modifier.args.get(1) {
        // The argument is a call to a registered uint256[] helper, so its
        // arguments can be counted as the role params
        Some(ModifierArg::Call { callee, arg_count }) if auth_helpers.contains(callee) => {
            *arg_count
        }
        _ => 0,
    };

    RoleUsage { id, param_count }
}

/// Names of functions eligible to appear as a role's parameter-list
/// argument: internal, pure, and returning exactly one `uint256[]` value.
/// Scanned over the whole unit, libraries and interfaces included.
fn collect_auth_helpers(unit: &SourceUnit) -> HashSet<String> {
    let mut helpers = HashSet::new();
    for function in unit.functions() {
        let name = match &function.name {
            Some(name) => name,
            None => continue,
        };
        if function.visibility != Some(Visibility::Internal)
            || function.mutability != Some(StateMutability::Pure)
            || function.returns.len() != 1
        {
            continue;
        }
        if let TypeName::Array { base, .. } = &function.returns[0].type_name {
            if matches!(base.as_ref(), TypeName::Elementary(n) if n == "uint256") {
                helpers.insert(name.clone());
            }
        }
    }
    helpers
}

/// `"contracts/Finance.sol"` and `"Finance"` both resolve to `"Finance"`
pub fn contract_name_from_path(target: &str) -> String {
    Path::new(target)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
        .to_string()
}
