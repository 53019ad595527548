use crate::domain::Phase;

/// Branches a release run operates on.
///
/// Single-branch and GitFlow-style workflows differ only in whether the two
/// names are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPlan {
    pub development: String,
    pub release: String,
}

impl BranchPlan {
    pub fn new(development: impl Into<String>, release: impl Into<String>) -> Self {
        BranchPlan {
            development: development.into(),
            release: release.into(),
        }
    }

    /// Both phases on one branch
    pub fn single(branch: impl Into<String>) -> Self {
        let branch = branch.into();
        BranchPlan {
            development: branch.clone(),
            release: branch,
        }
    }

    /// The branch a phase must have checked out
    pub fn for_phase(&self, phase: Phase) -> &str {
        match phase {
            Phase::PreRelease | Phase::Release => &self.release,
            Phase::PostRelease => &self.development,
        }
    }

    /// Distinct branches touched by a run, release branch first
    pub fn touched(&self) -> Vec<&str> {
        if self.release == self.development {
            vec![self.release.as_str()]
        } else {
            vec![self.release.as_str(), self.development.as_str()]
        }
    }
}
