use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use git_release::cli::{run_release_workflow, ReleaseWorkflowArgs, WorkflowResult};
use git_release::config::{self, Config};
use git_release::domain::{Phase, VersionBump};
use git_release::git::{Backend, Git2Repository};
use git_release::release::{post_release_message, pre_release_message};
use git_release::ui::{self, ConsoleSink};

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    about = "Cut a release: set the release version, tag it, then move to the next development version"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, default_value = ".", help = "Path inside the repository to release")]
    repo: PathBuf,

    #[arg(long, help = "Branch receiving the next development version")]
    dev_branch: Option<String>,

    #[arg(long, help = "Branch receiving the release commit and tag")]
    release_branch: Option<String>,

    #[arg(long, help = "Manifest file declaring the version")]
    manifest: Option<PathBuf>,

    #[arg(long, help = "Notes file holding the release block")]
    notes_file: Option<PathBuf>,

    #[arg(long, help = "Explicit next development version")]
    next_version: Option<String>,

    #[arg(long, help = "Component to bump for the next version (major, minor, patch)")]
    bump: Option<VersionBump>,

    #[arg(long, help = "Mark this release as a release candidate")]
    release_candidate: bool,

    #[arg(long, help = "Text rendered into the release block")]
    notes: Option<String>,

    #[arg(long, help = "Resume an interrupted run (pre-release, release, post-release)")]
    resume_from: Option<Phase>,

    #[arg(long, help = "Release version when resuming past pre-release")]
    release_version: Option<String>,

    #[arg(long, help = "Git backend (libgit2, system)")]
    backend: Option<Backend>,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

impl Args {
    fn workflow_args(&self) -> ReleaseWorkflowArgs {
        ReleaseWorkflowArgs {
            repo_path: self.repo.clone(),
            dev_branch: self.dev_branch.clone(),
            release_branch: self.release_branch.clone(),
            manifest_file: self.manifest.clone(),
            notes_file: self.notes_file.clone(),
            next_version: self.next_version.clone(),
            bump: self.bump,
            release_candidate: self.release_candidate,
            notes: self.notes.clone(),
            resume_from: self.resume_from,
            release_version: self.release_version.clone(),
            backend: self.backend,
            dry_run: self.dry_run,
        }
    }
}

/// Working tree root used to find `release.toml`; falls back to the given path
fn repository_root(path: &Path) -> PathBuf {
    Git2Repository::open(path)
        .ok()
        .and_then(|repo| repo.workdir())
        .unwrap_or_else(|| path.to_path_buf())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("git-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let root = repository_root(&args.repo);
    let config: Config = match config::load_config(args.config.as_deref(), &root) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let workflow = args.workflow_args();

    if !args.force
        && !args.dry_run
        && !ui::confirm_action(&format!(
            "Release from '{}' in {}?",
            workflow
                .release_branch
                .as_deref()
                .or(config.branches.release.as_deref())
                .unwrap_or(&config.branches.development),
            root.display()
        ))?
    {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    let sink = ConsoleSink;
    match run_release_workflow(&workflow, &config, &sink) {
        Ok(WorkflowResult::Planned { plan, tag }) => {
            ui::display_status("Dry run, nothing was changed");
            ui::display_plan(
                &plan,
                &tag,
                &pre_release_message(&plan.release),
                &post_release_message(&plan.release),
            );
        }
        Ok(WorkflowResult::Released(outcome)) => {
            println!(
                "\n{} Released {} as {}\n",
                console::style("✓").green(),
                outcome.plan.release,
                outcome.tag
            );
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}
