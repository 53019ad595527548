use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::workspace::Workspace;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

type Tree = BTreeMap<PathBuf, String>;

/// A commit recorded by the mock repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCommit {
    pub id: String,
    pub message: String,
    pub files: Tree,
}

#[derive(Debug, Default)]
struct MockState {
    current: String,
    branches: HashMap<String, Vec<MockCommit>>,
    worktree: Tree,
    index: Tree,
    tags: BTreeMap<String, String>,
    next_id: u32,
}

impl MockState {
    fn head(&self) -> Option<&MockCommit> {
        self.branches.get(&self.current).and_then(|c| c.last())
    }

    fn head_tree(&self) -> Tree {
        self.head().map(|c| c.files.clone()).unwrap_or_default()
    }

    fn new_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:07x}{:033x}", self.next_id, 0)
    }
}

/// In-memory repository and working tree.
///
/// Implements both [Repository] and [Workspace], so files written through
/// the workspace are what `stage` sees, and `checkout` swaps the working
/// tree to the target branch's last commit the way git does.
pub struct MockRepository {
    state: RefCell<MockState>,
}

impl MockRepository {
    /// Create a repository with one branch and an empty root commit
    pub fn new(branch: impl Into<String>) -> Self {
        let branch = branch.into();
        let mut state = MockState {
            current: branch.clone(),
            ..Default::default()
        };
        let root = MockCommit {
            id: state.new_id(),
            message: "Initial commit".to_string(),
            files: Tree::new(),
        };
        state.branches.insert(branch, vec![root]);
        MockRepository {
            state: RefCell::new(state),
        }
    }

    /// Commit a file directly on the current branch (test setup)
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let path = path.into();
            let contents = contents.into();
            let mut files = state.head_tree();
            files.insert(path, contents);
            let commit = MockCommit {
                id: state.new_id(),
                message: "setup".to_string(),
                files: files.clone(),
            };
            let current = state.current.clone();
            state.branches.entry(current).or_default().push(commit);
            state.worktree = files.clone();
            state.index = files;
        }
        self
    }

    /// Create a branch at the current branch's head
    pub fn with_branch(self, name: impl Into<String>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let history = state
                .branches
                .get(&state.current)
                .cloned()
                .unwrap_or_default();
            state.branches.insert(name.into(), history);
        }
        self
    }

    /// Tag the current head (test setup)
    pub fn with_tag(self, name: impl Into<String>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let id = state.head().map(|c| c.id.clone()).unwrap_or_default();
            state.tags.insert(name.into(), id);
        }
        self
    }

    /// Commits on a branch, oldest first
    pub fn commits(&self, branch: &str) -> Vec<MockCommit> {
        self.state
            .borrow()
            .branches
            .get(branch)
            .cloned()
            .unwrap_or_default()
    }

    /// Commit messages on a branch, oldest first
    pub fn messages(&self, branch: &str) -> Vec<String> {
        self.commits(branch).into_iter().map(|c| c.message).collect()
    }

    /// File contents at the tip of a branch
    pub fn file_on(&self, branch: &str, path: impl AsRef<Path>) -> Option<String> {
        self.commits(branch)
            .last()
            .and_then(|c| c.files.get(path.as_ref()).cloned())
    }

    /// File contents in the working tree
    pub fn worktree_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.borrow().worktree.get(path.as_ref()).cloned()
    }

    /// Commit id a tag points at
    pub fn tag_target(&self, name: &str) -> Option<String> {
        self.state.borrow().tags.get(name).cloned()
    }

    pub fn tags(&self) -> Vec<String> {
        self.state.borrow().tags.keys().cloned().collect()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.state.borrow().current.clone())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        let command = format!("git checkout {}", branch);
        let mut state = self.state.borrow_mut();

        if state.current == branch {
            return Ok(());
        }

        let target = state
            .branches
            .get(branch)
            .and_then(|c| c.last())
            .map(|c| c.files.clone())
            .ok_or_else(|| {
                ReleaseError::git(
                    command.as_str(),
                    format!(
                        "error: pathspec '{}' did not match any file(s) known to git",
                        branch
                    ),
                )
            })?;

        if state.worktree != state.head_tree() || state.index != state.head_tree() {
            return Err(ReleaseError::git(
                command.as_str(),
                "error: Your local changes to the following files would be overwritten by checkout",
            ));
        }

        state.current = branch.to_string();
        state.worktree = target.clone();
        state.index = target;
        Ok(())
    }

    fn stage(&self, paths: &[&Path]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for path in paths {
            let contents = state.worktree.get(*path).cloned().ok_or_else(|| {
                ReleaseError::git(
                    format!("git add -- {}", path.display()),
                    format!(
                        "fatal: pathspec '{}' did not match any files",
                        path.display()
                    ),
                )
            })?;
            state.index.insert(path.to_path_buf(), contents);
        }
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();

        if state.index == state.head_tree() {
            return Err(ReleaseError::NothingToCommit(
                "nothing added to commit".to_string(),
            ));
        }

        let commit = MockCommit {
            id: state.new_id(),
            message: message.to_string(),
            files: state.index.clone(),
        };
        let id = commit.id.clone();
        let current = state.current.clone();
        state.branches.entry(current).or_default().push(commit);
        Ok(id)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state.borrow().tags.contains_key(name))
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.tags.contains_key(name) {
            return Err(ReleaseError::TagAlreadyExists(name.to_string()));
        }
        let id = state.head().map(|c| c.id.clone()).unwrap_or_default();
        state.tags.insert(name.to_string(), id);
        Ok(())
    }
}

impl Workspace for MockRepository {
    fn read(&self, path: &Path) -> Result<String> {
        self.state
            .borrow()
            .worktree
            .get(path)
            .cloned()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )
                .into()
            })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .worktree
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
