//! Git operations abstraction layer
//!
//! The [Repository] trait is the seam between the release state machine and
//! the working repository. Implementations:
//!
//! - [repository::Git2Repository]: libgit2 via the `git2` crate
//! - [cli::CliRepository]: the system `git` binary driven through a
//!   [runner::CommandRunner]
//! - [mock::MockRepository]: in-memory repository and workspace for tests
//!
//! [orchestrator::GitOrchestrator] sequences trait calls for a phase and
//! reports each action to the progress sink.

pub mod cli;
pub mod mock;
pub mod orchestrator;
pub mod repository;
pub mod runner;

pub use cli::CliRepository;
pub use mock::MockRepository;
pub use orchestrator::GitOrchestrator;
pub use repository::Git2Repository;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Working-copy operations a release needs.
///
/// Every call blocks until the underlying operation finishes. Nothing is
/// retried and nothing is pushed to a remote.
///
/// ## Error Handling
///
/// - checkout of a missing branch, or over conflicting local changes, is
///   `GitCommandFailed`
/// - `commit` with nothing staged relative to HEAD is `NothingToCommit`
/// - `create_tag` for an existing tag is `TagAlreadyExists`
pub trait Repository {
    /// Name of the checked-out branch; detached HEAD is an error
    fn current_branch(&self) -> Result<String>;

    /// Switch the working tree to a local branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Add exactly these paths (relative to the repository root) to the index
    fn stage(&self, paths: &[&Path]) -> Result<()>;

    /// Commit the index on the current branch and return the new commit id
    fn commit(&self, message: &str) -> Result<String>;

    /// Whether a tag with this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create a lightweight tag at HEAD
    fn create_tag(&self, name: &str) -> Result<()>;
}

/// Which implementation drives the real repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Libgit2,
    System,
}

impl std::str::FromStr for Backend {
    type Err = crate::error::ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "libgit2" | "git2" => Ok(Backend::Libgit2),
            "system" | "git" => Ok(Backend::System),
            other => Err(crate::error::ReleaseError::config(format!(
                "Unknown git backend '{}': expected libgit2 or system",
                other
            ))),
        }
    }
}

/// Shorten a commit id for display
pub fn short_id(id: &str) -> &str {
    if id.len() > 7 {
        &id[..7]
    } else {
        id
    }
}
