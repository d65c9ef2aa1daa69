//! Version bump parsing and validation

use semver::Version;

use crate::PublishError;

/// The release increment requested for a publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

impl Bump {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bump::Major => "major",
            Bump::Minor => "minor",
            Bump::Patch => "patch",
        }
    }

    /// The version this bump produces from `prev`
    pub fn apply(&self, prev: &Version) -> Version {
        match self {
            Bump::Major => Version::new(prev.major + 1, 0, 0),
            Bump::Minor => Version::new(prev.major, prev.minor + 1, 0),
            Bump::Patch => Version::new(prev.major, prev.minor, prev.patch + 1),
        }
    }
}

impl std::fmt::Display for Bump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a user-supplied `major`/`minor`/`patch` keyword or explicit
/// semver string into the next version to publish.
///
/// An explicit version must be exactly one bump away from the previous
/// published version. A first release (no previous version) bumps from
/// 0.0.0 and accepts any explicit initial version.
pub fn parse_bump_or_version(
    input: &str,
    prev: Option<&Version>,
) -> Result<(Version, Bump), PublishError> {
    let base = prev.cloned().unwrap_or_else(|| Version::new(0, 0, 0));

    let bump = match input {
        "major" => Some(Bump::Major),
        "minor" => Some(Bump::Minor),
        "patch" => Some(Bump::Patch),
        _ => None,
    };
    if let Some(bump) = bump {
        return Ok((bump.apply(&base), bump));
    }

    let version = Version::parse(input).map_err(|err| PublishError::InvalidBump {
        input: input.to_string(),
        reason: err.to_string(),
    })?;

    if prev.is_none() {
        return Ok((version.clone(), classify_initial(&version)));
    }

    for bump in [Bump::Major, Bump::Minor, Bump::Patch] {
        if bump.apply(&base) == version {
            return Ok((version, bump));
        }
    }
    Err(PublishError::InvalidBump {
        input: input.to_string(),
        reason: format!("not a single bump from previous version {base}"),
    })
}

/// Bump kind of a first release, by its highest nonzero component
fn classify_initial(version: &Version) -> Bump {
    if version.major > 0 {
        Bump::Major
    } else if version.minor > 0 {
        Bump::Minor
    } else {
        Bump::Patch
    }
}
