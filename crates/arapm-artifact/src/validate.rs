//! Release directory validation

use std::path::Path;

use tracing::debug;

use crate::{ArtifactError, ARTIFACT_NAME, FLAT_CODE_NAME, MANIFEST_NAME};

/// Entry page required when the release ships a frontend
pub const FRONTEND_INDEX: &str = "index.html";

/// Check that `dist_dir` holds every file a release must ship. The first
/// missing file aborts the check; callers run this right before upload.
pub fn validate_artifacts(dist_dir: &Path, has_frontend: bool) -> Result<(), ArtifactError> {
    let mut required = vec![ARTIFACT_NAME, MANIFEST_NAME, FLAT_CODE_NAME];
    if has_frontend {
        required.push(FRONTEND_INDEX);
    }
    for name in required {
        let path = dist_dir.join(name);
        if !path.is_file() {
            return Err(ArtifactError::MissingReleaseFile(path));
        }
        debug!(file = %path.display(), "release file present");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn release_dir(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        dir
    }

    #[test]
    fn accepts_complete_release() {
        let dir = release_dir(&[ARTIFACT_NAME, MANIFEST_NAME, FLAT_CODE_NAME]);
        validate_artifacts(dir.path(), false).unwrap();
    }

    #[test]
    fn rejects_missing_artifact() {
        let dir = release_dir(&[MANIFEST_NAME, FLAT_CODE_NAME]);
        let err = validate_artifacts(dir.path(), false).unwrap_err();
        match err {
            ArtifactError::MissingReleaseFile(path) => {
                assert!(path.ends_with(ARTIFACT_NAME));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn frontend_requires_index_html() {
        let dir = release_dir(&[ARTIFACT_NAME, MANIFEST_NAME, FLAT_CODE_NAME]);
        validate_artifacts(dir.path(), false).unwrap();
        let err = validate_artifacts(dir.path(), true).unwrap_err();
        match err {
            ArtifactError::MissingReleaseFile(path) => {
                assert!(path.ends_with(FRONTEND_INDEX));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
