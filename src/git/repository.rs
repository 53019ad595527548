use crate::error::{ReleaseError, Result};
use git2::{BranchType, ErrorCode, ObjectType, Repository as Git2Repo};
use std::path::{Path, PathBuf};

/// Map a libgit2 failure to the command a user would have typed
fn failed(command: impl Into<String>, err: git2::Error) -> ReleaseError {
    ReleaseError::git(command, err.message())
}

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path)
            .map_err(|e| failed(format!("git -C {} rev-parse", path.display()), e))?;

        Ok(Git2Repository { repo })
    }

    /// Root of the working tree, `None` for bare repositories
    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let command = "git rev-parse --abbrev-ref HEAD";
        let head = self.repo.head().map_err(|e| failed(command, e))?;

        if !head.is_branch() {
            return Err(ReleaseError::git(command, "HEAD is detached"));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::git(command, "branch name is not valid UTF-8"))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        let command = format!("git checkout {}", branch);

        let local = self
            .repo
            .find_branch(branch, BranchType::Local)
            .map_err(|e| failed(command.as_str(), e))?;
        let refname = local
            .get()
            .name()
            .ok_or_else(|| ReleaseError::git(command.as_str(), "branch name is not valid UTF-8"))?
            .to_string();
        let target = local
            .get()
            .peel(ObjectType::Commit)
            .map_err(|e| failed(command.as_str(), e))?;

        // Safe mode refuses to overwrite conflicting local modifications.
        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();
        self.repo
            .checkout_tree(&target, Some(&mut checkout))
            .map_err(|e| failed(command.as_str(), e))?;
        self.repo
            .set_head(&refname)
            .map_err(|e| failed(command.as_str(), e))?;

        Ok(())
    }

    fn stage(&self, paths: &[&Path]) -> Result<()> {
        let command = format!(
            "git add -- {}",
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut index = self.repo.index().map_err(|e| failed(command.as_str(), e))?;
        for path in paths {
            index
                .add_path(path)
                .map_err(|e| failed(command.as_str(), e))?;
        }
        index.write().map_err(|e| failed(command.as_str(), e))?;

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let command = format!("git commit -m {:?}", message);

        let mut index = self.repo.index().map_err(|e| failed(command.as_str(), e))?;
        let tree_id = index.write_tree().map_err(|e| failed(command.as_str(), e))?;
        let parent = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| failed(command.as_str(), e))?;

        if parent.tree_id() == tree_id {
            return Err(ReleaseError::NothingToCommit(format!(
                "index matches HEAD ({})",
                parent.id()
            )));
        }

        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(|e| failed(command.as_str(), e))?;
        let signature = self
            .repo
            .signature()
            .map_err(|e| failed(command.as_str(), e))?;
        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &[&parent],
            )
            .map_err(|e| failed(command.as_str(), e))?;

        Ok(oid.to_string())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(failed(format!("git rev-parse --verify {}", reference_name), e)),
        }
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let command = format!("git tag {}", name);

        let head = self
            .repo
            .head()
            .and_then(|head| head.peel(ObjectType::Commit))
            .map_err(|e| failed(command.as_str(), e))?;

        match self.repo.tag_lightweight(name, &head, false) {
            Ok(_) => Ok(()),
            Err(e) if e.code() == ErrorCode::Exists => {
                Err(ReleaseError::TagAlreadyExists(name.to_string()))
            }
            Err(e) => Err(failed(command, e)),
        }
    }
}
