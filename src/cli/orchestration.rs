//! Release workflow orchestration
//!
//! Turns CLI arguments plus configuration into [ReleaseOptions], opens the
//! repository with the selected backend, and runs the state machine. Kept
//! apart from `main.rs` so the workflow can be driven without clap.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::{BranchPlan, Phase, ReleasePlan, VersionBump};
use crate::error::{ReleaseError, Result};
use crate::git::{Backend, CliRepository, Git2Repository, Repository};
use crate::hooks::ScriptHook;
use crate::release::{
    NoopExtension, ReleaseExtension, ReleaseOptions, ReleaseOutcome, ReleaseStateMachine,
};
use crate::ui::ProgressSink;
use crate::workspace::FsWorkspace;

/// Arguments for the release workflow
///
/// Every `Option` left as `None` falls back to the configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Any path inside the repository
    pub repo_path: PathBuf,
    pub dev_branch: Option<String>,
    pub release_branch: Option<String>,
    pub manifest_file: Option<PathBuf>,
    pub notes_file: Option<PathBuf>,
    pub next_version: Option<String>,
    pub bump: Option<VersionBump>,
    pub release_candidate: bool,
    pub notes: Option<String>,
    pub resume_from: Option<Phase>,
    pub release_version: Option<String>,
    pub backend: Option<Backend>,
    /// Resolve and print the plan only
    pub dry_run: bool,
}

/// Result of a successful workflow
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    /// Dry run: what would happen
    Planned { plan: ReleasePlan, tag: String },
    Released(ReleaseOutcome),
}

/// Merge CLI arguments over configuration.
///
/// Branches: an explicit release branch wins, then the configured one, then
/// the development branch.
pub fn build_options(args: &ReleaseWorkflowArgs, config: &Config) -> Result<ReleaseOptions> {
    let mut options = ReleaseOptions::from_config(config)?;

    let development = args
        .dev_branch
        .clone()
        .unwrap_or_else(|| config.branches.development.clone());
    let release = args
        .release_branch
        .clone()
        .or_else(|| config.branches.release.clone())
        .unwrap_or_else(|| development.clone());
    options.branches = BranchPlan::new(development, release);

    if let Some(manifest) = &args.manifest_file {
        options.manifest_file = manifest.clone();
    }
    if let Some(notes_file) = &args.notes_file {
        options.notes_file = notes_file.clone();
    }
    if let Some(bump) = args.bump {
        options.bump = bump;
    }
    if let Some(phase) = args.resume_from {
        options.resume_from = phase;
    }

    options.next_version_override = args.next_version.clone();
    options.release_candidate = args.release_candidate;
    options.notes = args.notes.clone();
    options.release_version = args.release_version.clone();

    if options.release_version.is_some() && options.resume_from == Phase::PreRelease {
        return Err(ReleaseError::config(
            "--release-version only applies when resuming from release or post-release",
        ));
    }

    Ok(options)
}

/// Open the repository with the chosen backend; returns it with its working tree root
fn open_repository(path: &Path, backend: Backend) -> Result<(Box<dyn Repository>, PathBuf)> {
    match backend {
        Backend::Libgit2 => {
            let repo = Git2Repository::open(path)?;
            let root = repo.workdir().ok_or_else(|| {
                ReleaseError::config(format!("{} is a bare repository", path.display()))
            })?;
            Ok((Box::new(repo), root))
        }
        Backend::System => {
            let repo = CliRepository::open(path).at_toplevel()?;
            let root = repo.root().to_path_buf();
            Ok((Box::new(repo), root))
        }
    }
}

/// Main release workflow
///
/// 1. Merge arguments over configuration
/// 2. Open the repository and its working tree
/// 3. Dry run: resolve and return the plan
/// 4. Otherwise run PRERELEASE → RELEASE → POSTRELEASE
pub fn run_release_workflow(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    sink: &dyn ProgressSink,
) -> Result<WorkflowResult> {
    let options = build_options(args, config)?;
    let backend = args.backend.unwrap_or(config.git.backend);
    let (repo, root) = open_repository(&args.repo_path, backend)?;
    let workspace = FsWorkspace::new(&root);

    let hook = config
        .hooks
        .release
        .as_ref()
        .map(|script| ScriptHook::new(script.clone(), root.clone()));
    let extension: &dyn ReleaseExtension = match &hook {
        Some(hook) => hook,
        None => &NoopExtension,
    };

    let mut machine = ReleaseStateMachine::new(&options, repo.as_ref(), &workspace, sink)?
        .with_extension(extension);

    if args.dry_run {
        let (plan, tag) = machine.preview()?;
        return Ok(WorkflowResult::Planned { plan, tag });
    }

    Ok(WorkflowResult::Released(machine.run()?))
}
