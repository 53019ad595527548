// tests/git_backend_test.rs
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use git_release::cli::{run_release_workflow, ReleaseWorkflowArgs, WorkflowResult};
use git_release::config::Config;
use git_release::git::{
    Backend, CliRepository, CommandOutput, CommandRunner, Git2Repository, Repository,
};
use git_release::ui::RecordingSink;
use git_release::{ReleaseError, Result};
use serial_test::serial;
use tempfile::TempDir;

// Helper function to setup a temporary git repo with a Gradle manifest
fn setup_test_repo(version: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = git2::Repository::init(temp_dir.path()).expect("Could not init git repo");

    // Configure git user
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    fs::write(
        temp_dir.path().join("build.gradle"),
        format!("group = 'com.example'\nversion = '{}'\n", version),
    )
    .expect("Could not write manifest");
    fs::write(temp_dir.path().join("README.md"), "# demo\n").expect("Could not write readme");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("build.gradle"))
        .expect("Could not add file to index");
    index
        .add_path(Path::new("README.md"))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let signature = repo.signature().expect("Could not get sig");
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial commit",
        &tree,
        &[],
    )
    .expect("Could not create commit");

    let branch = repo
        .head()
        .expect("Could not read HEAD")
        .shorthand()
        .expect("Branch name is not UTF-8")
        .to_string();

    (temp_dir, branch)
}

fn head_message(path: &Path) -> String {
    let repo = git2::Repository::open(path).unwrap();
    let commit = repo.head().unwrap().peel_to_commit().unwrap();
    commit.message().unwrap_or_default().to_string()
}

#[test]
fn test_git2_repository_operations() {
    let (temp_dir, branch) = setup_test_repo("1.0.0-SNAPSHOT");
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    assert_eq!(repo.current_branch().unwrap(), branch);
    assert!(!repo.tag_exists("releases/v1.0.0").unwrap());

    // Staging an unchanged file leaves nothing to commit
    repo.stage(&[Path::new("build.gradle")]).unwrap();
    assert!(matches!(
        repo.commit("noop"),
        Err(ReleaseError::NothingToCommit(_))
    ));

    fs::write(temp_dir.path().join("build.gradle"), "version = '1.0.0'\n").unwrap();
    repo.stage(&[Path::new("build.gradle")]).unwrap();
    let id = repo.commit("[pre-release] 1.0.0").unwrap();
    assert_eq!(id.len(), 40);
    assert_eq!(head_message(temp_dir.path()), "[pre-release] 1.0.0");

    repo.create_tag("releases/v1.0.0").unwrap();
    assert!(repo.tag_exists("releases/v1.0.0").unwrap());
    assert!(matches!(
        repo.create_tag("releases/v1.0.0"),
        Err(ReleaseError::TagAlreadyExists(_))
    ));
}

#[test]
fn test_git2_checkout_missing_branch() {
    let (temp_dir, _) = setup_test_repo("1.0.0-SNAPSHOT");
    let repo = Git2Repository::open(temp_dir.path()).unwrap();
    assert!(matches!(
        repo.checkout("does-not-exist"),
        Err(ReleaseError::GitCommandFailed { .. })
    ));
}

#[test]
fn test_release_workflow_with_libgit2() {
    let (temp_dir, branch) = setup_test_repo("1.0.0-SNAPSHOT");
    let sink = RecordingSink::new();
    let args = ReleaseWorkflowArgs {
        repo_path: temp_dir.path().to_path_buf(),
        dev_branch: Some(branch.clone()),
        bump: Some(git_release::domain::VersionBump::Minor),
        backend: Some(Backend::Libgit2),
        ..Default::default()
    };

    let result = run_release_workflow(&args, &Config::default(), &sink).unwrap();
    let outcome = match result {
        WorkflowResult::Released(outcome) => outcome,
        other => panic!("expected a release, got {:?}", other),
    };

    assert_eq!(outcome.tag, "releases/v1.0.0");
    assert_eq!(outcome.commits.len(), 2);
    assert_eq!(head_message(temp_dir.path()), "[post-release] 1.0.0");

    let manifest = fs::read_to_string(temp_dir.path().join("build.gradle")).unwrap();
    assert!(manifest.contains("version = '1.1.0-SNAPSHOT'"));
    let readme = fs::read_to_string(temp_dir.path().join("README.md")).unwrap();
    assert!(readme.contains("<!-- release-block:begin -->"));

    let repo = git2::Repository::open(temp_dir.path()).unwrap();
    let tagged = repo
        .revparse_single("releases/v1.0.0")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(tagged.message(), Some("[pre-release] 1.0.0"));
    assert_eq!(tagged.id().to_string(), outcome.commits[0]);
}

#[test]
fn test_dry_run_changes_nothing() {
    let (temp_dir, branch) = setup_test_repo("0.2.0-SNAPSHOT");
    let sink = RecordingSink::new();
    let args = ReleaseWorkflowArgs {
        repo_path: temp_dir.path().to_path_buf(),
        dev_branch: Some(branch),
        dry_run: true,
        ..Default::default()
    };

    let result = run_release_workflow(&args, &Config::default(), &sink).unwrap();
    match result {
        WorkflowResult::Planned { plan, tag } => {
            assert_eq!(plan.release.to_string(), "0.2.0");
            assert_eq!(plan.next.to_string(), "0.2.1-SNAPSHOT");
            assert_eq!(tag, "releases/v0.2.0");
        }
        other => panic!("expected a plan, got {:?}", other),
    }

    assert_eq!(head_message(temp_dir.path()), "Initial commit");
    let manifest = fs::read_to_string(temp_dir.path().join("build.gradle")).unwrap();
    assert!(manifest.contains("0.2.0-SNAPSHOT"));
}

#[test]
#[serial]
fn test_release_workflow_with_system_git() {
    let git_available = std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !git_available {
        return;
    }

    let (temp_dir, branch) = setup_test_repo("2.0.0-SNAPSHOT");
    let sink = RecordingSink::new();
    let args = ReleaseWorkflowArgs {
        repo_path: temp_dir.path().to_path_buf(),
        dev_branch: Some(branch),
        backend: Some(Backend::System),
        ..Default::default()
    };

    let result = run_release_workflow(&args, &Config::default(), &sink).unwrap();
    assert!(matches!(result, WorkflowResult::Released(_)));
    assert_eq!(head_message(temp_dir.path()).trim_end(), "[post-release] 2.0.0");

    let repo = git2::Repository::open(temp_dir.path()).unwrap();
    assert!(repo.find_reference("refs/tags/releases/v2.0.0").is_ok());
}

/// Command runner replaying canned outputs and recording invocations
struct ScriptedRunner {
    replies: RefCell<VecDeque<CommandOutput>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    fn new(replies: Vec<CommandOutput>) -> Self {
        ScriptedRunner {
            replies: RefCell::new(replies.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push(format!("{} {}", program, args.join(" ")));
        Ok(self.replies.borrow_mut().pop_front().unwrap_or_default())
    }
}

fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

#[test]
fn test_cli_commit_checks_staged_changes_first() {
    let runner = ScriptedRunner::new(vec![
        exit(1, "", ""),
        exit(0, "[main abc1234] msg\n", ""),
        exit(0, "abc1234def\n", ""),
    ]);
    let repo = CliRepository::with_runner("/repo", runner);

    let id = repo.commit("[pre-release] 1.0.0").unwrap();
    assert_eq!(id, "abc1234def");
    assert_eq!(
        repo.runner().calls(),
        vec![
            "git diff --cached --quiet",
            "git commit -m [pre-release] 1.0.0",
            "git rev-parse HEAD",
        ]
    );
}

#[test]
fn test_cli_commit_with_clean_index() {
    let repo = CliRepository::with_runner("/repo", ScriptedRunner::new(vec![exit(0, "", "")]));
    assert!(matches!(
        repo.commit("[post-release] 1.0.0"),
        Err(ReleaseError::NothingToCommit(_))
    ));
    assert_eq!(repo.runner().calls().len(), 1);
}

#[test]
fn test_cli_tag_handling() {
    let runner = ScriptedRunner::new(vec![
        exit(1, "", ""),
        exit(0, "abc\n", ""),
        exit(128, "", "fatal: tag 'releases/v1.0.0' already exists\n"),
        exit(128, "", "fatal: not a git repository\n"),
    ]);
    let repo = CliRepository::with_runner("/repo", runner);

    assert!(!repo.tag_exists("releases/v1.0.0").unwrap());
    assert!(repo.tag_exists("releases/v1.0.0").unwrap());
    assert!(matches!(
        repo.create_tag("releases/v1.0.0"),
        Err(ReleaseError::TagAlreadyExists(_))
    ));
    assert!(matches!(
        repo.create_tag("releases/v1.0.0"),
        Err(ReleaseError::GitCommandFailed { .. })
    ));
}

#[test]
fn test_cli_detached_head() {
    let repo = CliRepository::with_runner("/repo", ScriptedRunner::new(vec![exit(0, "HEAD\n", "")]));
    assert!(repo.current_branch().is_err());
}

#[test]
fn test_cli_stage_and_checkout_arguments() {
    let repo = CliRepository::with_runner(
        "/repo",
        ScriptedRunner::new(vec![exit(0, "", ""), exit(0, "", "")]),
    );
    repo.stage(&[Path::new("build.gradle"), Path::new("README.md")])
        .unwrap();
    repo.checkout("develop").unwrap();
    assert_eq!(
        repo.runner().calls(),
        vec![
            "git add -- build.gradle README.md",
            "git checkout develop --",
        ]
    );
}

#[cfg(unix)]
#[test]
#[serial]
fn test_release_hook_sees_release_environment() {
    use std::os::unix::fs::PermissionsExt;

    let (temp_dir, branch) = setup_test_repo("1.2.0-SNAPSHOT");
    let script = temp_dir.path().join("publish.sh");
    fs::write(
        &script,
        "#!/bin/sh\necho \"publishing $RELEASE_VERSION as $RELEASE_TAG (next $RELEASE_NEXT_VERSION)\"\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = Config::default();
    config.hooks.release = Some("publish.sh".into());
    let sink = RecordingSink::new();
    let args = ReleaseWorkflowArgs {
        repo_path: temp_dir.path().to_path_buf(),
        dev_branch: Some(branch),
        ..Default::default()
    };

    run_release_workflow(&args, &config, &sink).unwrap();
    assert!(sink.contains(
        "[RELEASE] hook: publishing 1.2.0 as releases/v1.2.0 (next 1.2.1-SNAPSHOT)"
    ));
}
