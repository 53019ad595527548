use crate::error::{ReleaseError, Result};
use crate::git::runner::{CommandOutput, CommandRunner, SystemRunner};
use crate::git::Repository;
use std::path::{Path, PathBuf};

/// Repository driven through the system `git` binary
pub struct CliRepository<R: CommandRunner = SystemRunner> {
    root: PathBuf,
    runner: R,
}

impl CliRepository<SystemRunner> {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        CliRepository {
            root: root.into(),
            runner: SystemRunner,
        }
    }
}

impl<R: CommandRunner> CliRepository<R> {
    pub fn with_runner(root: impl Into<PathBuf>, runner: R) -> Self {
        CliRepository {
            root: root.into(),
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Re-root at the top of the working tree containing `root`
    pub fn at_toplevel(self) -> Result<Self> {
        let toplevel = PathBuf::from(self.git_ok(&["rev-parse", "--show-toplevel"])?);
        Ok(CliRepository {
            root: toplevel,
            runner: self.runner,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run("git", args, &self.root)
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit
    fn git_ok(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;
        if output.success() {
            Ok(output.stdout.trim().to_string())
        } else {
            Err(Self::failure(args, &output))
        }
    }

    fn failure(args: &[&str], output: &CommandOutput) -> ReleaseError {
        ReleaseError::git(format!("git {}", args.join(" ")), output.combined())
    }
}

impl<R: CommandRunner> Repository for CliRepository<R> {
    fn current_branch(&self) -> Result<String> {
        let args = ["rev-parse", "--abbrev-ref", "HEAD"];
        let branch = self.git_ok(&args)?;
        if branch == "HEAD" {
            return Err(ReleaseError::git(
                format!("git {}", args.join(" ")),
                "HEAD is detached",
            ));
        }
        Ok(branch)
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.git_ok(&["checkout", branch, "--"])?;
        Ok(())
    }

    fn stage(&self, paths: &[&Path]) -> Result<()> {
        let rendered: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        let mut args = vec!["add", "--"];
        args.extend(rendered.iter().map(String::as_str));
        self.git_ok(&args)?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        // Exit code 0 means the index matches HEAD.
        let args = ["diff", "--cached", "--quiet"];
        let diff = self.git(&args)?;
        match diff.status {
            Some(0) => {
                return Err(ReleaseError::NothingToCommit(
                    "no staged changes".to_string(),
                ))
            }
            Some(1) => {}
            _ => return Err(Self::failure(&args, &diff)),
        }

        self.git_ok(&["commit", "-m", message])?;
        self.git_ok(&["rev-parse", "HEAD"])
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let reference = format!("refs/tags/{}", name);
        let args = ["rev-parse", "--verify", "--quiet", reference.as_str()];
        let output = self.git(&args)?;
        match output.status {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Self::failure(&args, &output)),
        }
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let args = ["tag", name];
        let output = self.git(&args)?;
        if output.success() {
            return Ok(());
        }
        if output.stderr.contains("already exists") {
            return Err(ReleaseError::TagAlreadyExists(name.to_string()));
        }
        Err(Self::failure(&args, &output))
    }
}
