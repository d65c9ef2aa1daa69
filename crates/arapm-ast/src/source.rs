//! Source-unit AST nodes (contracts and their declarations)

use serde::{Deserialize, Serialize};

use crate::Span;

/// A parsed flattened source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    pub items: Vec<SourceItem>,
    pub span: Span,
}

impl SourceUnit {
    /// Iterate over every contract-like definition (contracts, interfaces,
    /// libraries) in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ContractDefinition> {
        self.items.iter().filter_map(|item| match item {
            SourceItem::Contract(def) => Some(def),
            _ => None,
        })
    }

    /// Iterate over every function definition anywhere in the unit
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.definitions().flat_map(|def| def.functions())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SourceItem {
    /// `pragma solidity ^0.4.24;` (directive text is not retained)
    Pragma,
    /// `import "./Foo.sol";` (flattened sources should not contain these,
    /// but tolerating them costs nothing)
    Import,
    /// A contract, interface or library definition
    Contract(ContractDefinition),
}

/// Which flavor of contract-like definition this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractKind {
    Contract,
    Interface,
    Library,
}

/// A contract, interface or library definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDefinition {
    pub name: String,
    pub kind: ContractKind,
    /// Base contract names from the `is` clause, in declaration order
    pub bases: Vec<String>,
    pub parts: Vec<ContractPart>,
    pub span: Span,
}

impl ContractDefinition {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.parts.iter().filter_map(|part| match part {
            ContractPart::Function(func) => Some(func),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContractPart {
    Function(FunctionDefinition),
    /// State variables, events, structs, enums, modifiers, using-for:
    /// skipped structurally, not needed by extraction
    Other,
}

/// A function header. Bodies are skipped by the parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// `None` for the unnamed fallback function
    pub name: Option<String>,
    pub params: Vec<Parameter>,
    pub visibility: Option<Visibility>,
    pub mutability: Option<StateMutability>,
    pub modifiers: Vec<ModifierInvocation>,
    pub returns: Vec<Parameter>,
    pub is_constructor: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateMutability {
    Pure,
    View,
    Constant,
    Payable,
}

/// A function or return parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub type_name: TypeName,
    pub name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeName {
    /// `uint256`, `address`, `bytes32`, ...
    Elementary(String),
    /// `T[]` or `T[3]`; the length is kept as literal text when present
    Array {
        base: Box<TypeName>,
        length: Option<String>,
    },
    /// Struct, enum or contract reference
    UserDefined(String),
    /// Mapping and function types; never valid as external call data but
    /// they do appear in parsed units
    Opaque,
}

impl TypeName {
    pub fn is_elementary(&self) -> bool {
        matches!(self, TypeName::Elementary(_))
    }
}

/// A modifier attached to a function header, e.g. `auth(TRANSFER_ROLE)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierInvocation {
    pub name: String,
    pub args: Vec<ModifierArg>,
    pub span: Span,
}

/// The argument shapes role extraction distinguishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierArg {
    /// A plain identifier reference, e.g. `TRANSFER_ROLE`
    Identifier(String),
    /// A call to a plain identifier, e.g. `arr(a, b)`
    Call { callee: String, arg_count: usize },
    /// Any other expression shape
    Other,
}
