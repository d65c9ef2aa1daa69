//! Extraction error types

use arapm_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source text is not valid Solidity. Fatal: aborts the release
    /// before any artifact is produced.
    #[error("failed to parse contract source: {0}")]
    Parse(#[from] ParseError),

    /// The parsed unit holds no contract definitions, so there is nothing
    /// to resolve a target against
    #[error("source contains no contract definitions")]
    NoContracts,
}
