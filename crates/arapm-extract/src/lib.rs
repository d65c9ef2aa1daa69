//! arapm Extract - function and role extraction
//!
//! Walks a parsed flattened contract and produces, per externally callable
//! state-modifying function, its canonical signature, the `auth`/`authP`
//! roles guarding it, and (best effort) the `@notice` documentation text.

mod error;
mod functions;
mod notices;

pub use error::*;
pub use functions::*;
pub use notices::*;
