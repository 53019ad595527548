use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Marker used when none is configured
pub const DEFAULT_DEVELOPMENT_MARKER: &str = "SNAPSHOT";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-(.+))?$")
            .expect("version pattern is valid")
    })
}

/// Semantic version as declared in a project manifest.
///
/// `prerelease` holds everything after the first `-`. The development
/// marker is either the whole prerelease (`1.0.0-SNAPSHOT`) or its trailing
/// `-MARKER` segment (`1.0.0-RC1-SNAPSHOT`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

impl SemanticVersion {
    /// Create a version without a prerelease qualifier
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Parse `MAJOR.MINOR.PATCH[-MARKER]`.
    ///
    /// Components must be non-negative integers without leading zeros. The
    /// marker must be a valid semver prerelease (dot-separated alphanumeric
    /// and hyphen identifiers).
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || ReleaseError::MalformedVersion {
            input: text.to_string(),
        };

        let captures = version_regex().captures(text).ok_or_else(malformed)?;

        let component = |idx: usize| -> Result<u64> {
            captures[idx].parse::<u64>().map_err(|_| malformed())
        };
        let major = component(1)?;
        let minor = component(2)?;
        let patch = component(3)?;

        let prerelease = match captures.get(4) {
            Some(m) => {
                semver::Prerelease::new(m.as_str()).map_err(|_| malformed())?;
                Some(m.as_str().to_string())
            }
            None => None,
        };

        Ok(SemanticVersion {
            major,
            minor,
            patch,
            prerelease,
        })
    }

    /// Whether this version carries the given development marker
    pub fn is_development(&self, marker: &str) -> bool {
        match &self.prerelease {
            Some(pre) => pre == marker || pre.ends_with(&format!("-{}", marker)),
            None => false,
        }
    }

    /// Return this version with the development marker applied
    pub fn with_marker(&self, marker: &str) -> Self {
        if self.is_development(marker) {
            return self.clone();
        }
        let prerelease = match &self.prerelease {
            Some(pre) => format!("{}-{}", pre, marker),
            None => marker.to_string(),
        };
        SemanticVersion {
            prerelease: Some(prerelease),
            ..self.clone()
        }
    }

    /// Return this version with the development marker removed.
    ///
    /// Other qualifiers are kept; components are never changed.
    pub fn without_marker(&self, marker: &str) -> Self {
        let prerelease = match &self.prerelease {
            Some(pre) if pre == marker => None,
            Some(pre) => match pre.strip_suffix(&format!("-{}", marker)) {
                Some(rest) => Some(rest.to_string()),
                None => Some(pre.clone()),
            },
            None => None,
        };
        SemanticVersion {
            prerelease,
            ..self.clone()
        }
    }

    /// Increment one component and zero the lower-order ones.
    ///
    /// The prerelease qualifier is dropped. A component already at `u64::MAX`
    /// cannot move forward and is an `InvariantViolation`.
    pub fn bump(&self, bump: VersionBump) -> Result<Self> {
        let overflow = || {
            ReleaseError::invariant(format!("cannot bump {} component of {}", bump, self))
        };
        let bumped = match bump {
            VersionBump::Major => {
                SemanticVersion::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => SemanticVersion::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            VersionBump::Patch => SemanticVersion::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(bumped)
    }

    /// Compare on `major.minor.patch` only; qualifiers are not ordered
    pub fn cmp_core(&self, other: &Self) -> Ordering {
        self.core().cmp(&other.core())
    }

    pub fn core(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Which component to increment when computing the next development version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Major,
    Minor,
    #[default]
    Patch,
}

impl FromStr for VersionBump {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(ReleaseError::config(format!(
                "Unknown bump component '{}': expected patch, minor or major",
                other
            ))),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Strip the development marker from `version`
pub fn to_release_version(version: &SemanticVersion, marker: &str) -> SemanticVersion {
    version.without_marker(marker)
}

/// Compute the next development version.
///
/// An override is parsed and gets the marker re-applied when it lacks one;
/// otherwise `bump` is applied to `version` and the marker is added.
pub fn to_next_version(
    version: &SemanticVersion,
    bump: VersionBump,
    override_version: Option<&str>,
    marker: &str,
) -> Result<SemanticVersion> {
    match override_version {
        Some(text) => Ok(SemanticVersion::parse(text.trim())?.with_marker(marker)),
        None => Ok(version.bump(bump)?.with_marker(marker)),
    }
}
