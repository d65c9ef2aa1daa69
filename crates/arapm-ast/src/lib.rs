//! arapm AST - Solidity syntax tree subset for function extraction
//!
//! This crate defines the node types the extractor needs: source units,
//! contract definitions, function headers with their modifier invocations,
//! and type names. Function bodies are never represented; the parser skips
//! them structurally.

mod span;
mod source;

pub use span::*;
pub use source::*;
