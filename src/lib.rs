//! arapm - Aragon app release tools
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use arapm_ast as ast;
pub use arapm_extract as extract;
pub use arapm_lexer as lexer;
pub use arapm_parser as parser;
