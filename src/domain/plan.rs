use crate::domain::version::{to_next_version, to_release_version, SemanticVersion, VersionBump};
use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;

/// The three versions a release run works with.
///
/// Computed once when the manifest is first read and never changed after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub current: SemanticVersion,
    pub release: SemanticVersion,
    pub next: SemanticVersion,
}

impl ReleasePlan {
    /// Resolve the release and next development versions from `current`.
    ///
    /// Fails with `InvariantViolation` unless `release < next` on the version
    /// core, `release` has no marker and `next` has one.
    pub fn resolve(
        current: SemanticVersion,
        bump: VersionBump,
        next_override: Option<&str>,
        marker: &str,
    ) -> Result<Self> {
        let release = to_release_version(&current, marker);
        let next = to_next_version(&release, bump, next_override, marker)?;

        let plan = ReleasePlan {
            current,
            release,
            next,
        };
        plan.check_invariants(marker)?;
        Ok(plan)
    }

    /// Build a plan when the release version is already known (resumed runs)
    pub fn from_release(
        release: SemanticVersion,
        bump: VersionBump,
        next_override: Option<&str>,
        marker: &str,
    ) -> Result<Self> {
        if release.is_development(marker) {
            return Err(ReleaseError::invariant(format!(
                "release version {} carries the development marker",
                release
            )));
        }
        Self::resolve(release, bump, next_override, marker)
    }

    fn check_invariants(&self, marker: &str) -> Result<()> {
        if self.release.is_development(marker) {
            return Err(ReleaseError::invariant(format!(
                "release version {} still carries the development marker",
                self.release
            )));
        }
        if !self.next.is_development(marker) {
            return Err(ReleaseError::invariant(format!(
                "next version {} lacks the development marker",
                self.next
            )));
        }
        if self.release.cmp_core(&self.next) != Ordering::Less {
            return Err(ReleaseError::invariant(format!(
                "next version {} does not move forward from release {}",
                self.next, self.release
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> SemanticVersion {
        SemanticVersion::parse(text).unwrap()
    }

    #[test]
    fn test_resolve_minor_bump() {
        let plan = ReleasePlan::resolve(v("1.0.0-SNAPSHOT"), VersionBump::Minor, None, "SNAPSHOT")
            .unwrap();
        assert_eq!(plan.release.to_string(), "1.0.0");
        assert_eq!(plan.next.to_string(), "1.1.0-SNAPSHOT");
    }

    #[test]
    fn test_resolve_override_wins_over_bump() {
        for bump in [VersionBump::Patch, VersionBump::Minor, VersionBump::Major] {
            let plan = ReleasePlan::resolve(
                v("1.4.2-SNAPSHOT"),
                bump,
                Some("2.0.0-SNAPSHOT"),
                "SNAPSHOT",
            )
            .unwrap();
            assert_eq!(plan.release.to_string(), "1.4.2");
            assert_eq!(plan.next.to_string(), "2.0.0-SNAPSHOT");
        }
    }

    #[test]
    fn test_override_not_ahead_of_release_is_rejected() {
        let err = ReleasePlan::resolve(
            v("1.4.2-SNAPSHOT"),
            VersionBump::Patch,
            Some("1.4.2-SNAPSHOT"),
            "SNAPSHOT",
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::InvariantViolation(_)));

        let err = ReleasePlan::resolve(
            v("1.4.2-SNAPSHOT"),
            VersionBump::Patch,
            Some("1.3.0"),
            "SNAPSHOT",
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::InvariantViolation(_)));
    }

    #[test]
    fn test_resolve_at_major_limit_is_rejected() {
        let err = ReleasePlan::resolve(
            v("18446744073709551615.0.0-SNAPSHOT"),
            VersionBump::Major,
            None,
            "SNAPSHOT",
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::InvariantViolation(_)));
    }

    #[test]
    fn test_from_release_rejects_development_version() {
        let err = ReleasePlan::from_release(v("1.0.0-SNAPSHOT"), VersionBump::Patch, None, "SNAPSHOT")
            .unwrap_err();
        assert!(matches!(err, ReleaseError::InvariantViolation(_)));
    }

    #[test]
    fn test_from_release() {
        let plan =
            ReleasePlan::from_release(v("1.0.0"), VersionBump::Minor, None, "SNAPSHOT").unwrap();
        assert_eq!(plan.current, plan.release);
        assert_eq!(plan.next.to_string(), "1.1.0-SNAPSHOT");
    }
}
