use crate::domain::Phase;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::ui::{ProgressEvent, ProgressSink};
use std::path::Path;

/// Sequences repository calls for a phase and reports each one.
///
/// Sole mutator of the checked-out branch and index during a run.
pub struct GitOrchestrator<'a> {
    repo: &'a dyn Repository,
    sink: &'a dyn ProgressSink,
}

impl<'a> GitOrchestrator<'a> {
    pub fn new(repo: &'a dyn Repository, sink: &'a dyn ProgressSink) -> Self {
        GitOrchestrator { repo, sink }
    }

    /// Check out `branch` and confirm HEAD actually moved there.
    ///
    /// Branch state is never cached; every phase calls this before acting.
    pub fn switch_to(&self, phase: Phase, branch: &str) -> Result<()> {
        self.repo.checkout(branch)?;

        let current = self.repo.current_branch()?;
        if current != branch {
            return Err(ReleaseError::git(
                format!("git checkout {}", branch),
                format!("HEAD is on '{}' after checkout", current),
            ));
        }

        self.sink.emit(&ProgressEvent::CheckedOut {
            phase,
            branch: current,
        });
        Ok(())
    }

    pub fn current_branch(&self) -> Result<String> {
        self.repo.current_branch()
    }

    pub fn stage(&self, phase: Phase, paths: &[&Path]) -> Result<()> {
        self.repo.stage(paths)?;
        self.sink.emit(&ProgressEvent::Staged {
            phase,
            files: paths.iter().map(|p| p.display().to_string()).collect(),
        });
        Ok(())
    }

    pub fn commit(&self, phase: Phase, message: &str) -> Result<String> {
        let id = self.repo.commit(message)?;
        self.sink.emit(&ProgressEvent::Committed {
            phase,
            id: id.clone(),
            message: message.to_string(),
        });
        Ok(id)
    }

    /// Fail with `TagAlreadyExists` when `name` is taken
    pub fn ensure_tag_absent(&self, name: &str) -> Result<()> {
        if self.repo.tag_exists(name)? {
            return Err(ReleaseError::TagAlreadyExists(name.to_string()));
        }
        Ok(())
    }

    pub fn tag(&self, phase: Phase, name: &str) -> Result<()> {
        self.repo.create_tag(name)?;
        self.sink.emit(&ProgressEvent::Tagged {
            phase,
            tag: name.to_string(),
        });
        Ok(())
    }
}
