//! arapm Parser - Recursive descent parser for flattened Solidity
//!
//! Produces the declaration-level AST the extractor consumes. Key scoping
//! decisions:
//! - function bodies and non-function members are skipped structurally
//! - modifier arguments are classified, not fully parsed: extraction only
//!   distinguishes identifier / call-to-identifier / anything else

mod error;
mod parser;

pub use error::*;
pub use parser::*;

use arapm_ast::SourceUnit;
use arapm_lexer::tokenize;

/// Parse a flattened source string into a SourceUnit AST
pub fn parse(source: &str) -> Result<SourceUnit, ParseError> {
    let tokens = tokenize(source);
    let mut parser = Parser::new(source, tokens);
    parser.parse_source_unit()
}
