//! arapm Artifact - release artifact assembly
//!
//! Merges extracted contract functions with the compiled ABI and the
//! `arapp.json` package descriptor into the `artifact.json` release
//! manifest, and validates the assembled release directory. Writing is
//! done here; uploading is the publisher's concern.

mod abi;
mod artifact;
mod descriptor;
mod error;
mod hash;
mod validate;

pub use abi::*;
pub use artifact::*;
pub use descriptor::*;
pub use error::*;
pub use hash::*;
pub use validate::*;

/// File names of a release directory
pub const ARTIFACT_NAME: &str = "artifact.json";
pub const MANIFEST_NAME: &str = "manifest.json";
pub const FLAT_CODE_NAME: &str = "code.sol";

/// Package descriptor file expected in the project root
pub const DESCRIPTOR_NAME: &str = "arapp.json";
