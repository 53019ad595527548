use crate::release::ReleaseContext;
use std::collections::HashMap;

/// Context information passed to a hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    pub release_version: String,
    pub next_version: String,
    pub tag: String,
    pub release_branch: String,
    pub development_branch: String,
    pub candidate: bool,
}

impl HookContext {
    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to RELEASE_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASE_VERSION".to_string(), self.release_version.clone());
        env.insert("RELEASE_NEXT_VERSION".to_string(), self.next_version.clone());
        env.insert("RELEASE_TAG".to_string(), self.tag.clone());
        env.insert("RELEASE_BRANCH".to_string(), self.release_branch.clone());
        env.insert(
            "RELEASE_DEV_BRANCH".to_string(),
            self.development_branch.clone(),
        );
        env.insert("RELEASE_CANDIDATE".to_string(), self.candidate.to_string());

        env
    }
}

impl From<&ReleaseContext<'_>> for HookContext {
    fn from(context: &ReleaseContext<'_>) -> Self {
        HookContext {
            release_version: context.plan.release.to_string(),
            next_version: context.plan.next.to_string(),
            tag: context.tag.to_string(),
            release_branch: context.branches.release.clone(),
            development_branch: context.branches.development.clone(),
            candidate: context.candidate,
        }
    }
}
