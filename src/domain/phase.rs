use crate::error::ReleaseError;
use std::fmt;
use std::str::FromStr;

/// Working phases of a release run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    PreRelease,
    Release,
    PostRelease,
}

impl Phase {
    /// The phase that follows this one, `None` after POSTRELEASE
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::PreRelease => Some(Phase::Release),
            Phase::Release => Some(Phase::PostRelease),
            Phase::PostRelease => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::PreRelease => "PRERELEASE",
            Phase::Release => "RELEASE",
            Phase::PostRelease => "POSTRELEASE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "prerelease" => Ok(Phase::PreRelease),
            "release" => Ok(Phase::Release),
            "postrelease" => Ok(Phase::PostRelease),
            _ => Err(ReleaseError::config(format!(
                "Unknown phase '{}': expected pre-release, release or post-release",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(Phase::PreRelease.next(), Some(Phase::Release));
        assert_eq!(Phase::Release.next(), Some(Phase::PostRelease));
        assert_eq!(Phase::PostRelease.next(), None);
        assert!(Phase::PreRelease < Phase::PostRelease);
    }

    #[test]
    fn test_phase_from_str() {
        assert_eq!("post-release".parse::<Phase>().unwrap(), Phase::PostRelease);
        assert_eq!("PRERELEASE".parse::<Phase>().unwrap(), Phase::PreRelease);
        assert_eq!("release".parse::<Phase>().unwrap(), Phase::Release);
        assert!("deploy".parse::<Phase>().is_err());
    }
}
