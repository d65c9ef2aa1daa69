//! arapm Publish - aragonPM release orchestration
//!
//! Drives a compiler, a content store and a registry through the
//! publish pipeline: resolve the next version, assemble and validate
//! the release artifacts, upload them and prepare the registry
//! transaction. Every stage is synchronous and the first failure aborts
//! the run.

mod error;
mod publish;
mod traits;
mod version;

pub use error::*;
pub use publish::*;
pub use traits::*;
pub use version::*;
