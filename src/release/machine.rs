use crate::domain::{Phase, ReleasePlan, SemanticVersion};
use crate::editor::{upsert, ManifestEditor, ReleaseNotes};
use crate::error::{PhaseContext, ReleaseError, Result};
use crate::git::{GitOrchestrator, Repository};
use crate::release::extension::{NoopExtension, ReleaseContext, ReleaseExtension};
use crate::release::options::ReleaseOptions;
use crate::ui::{ProgressEvent, ProgressSink};
use crate::workspace::Workspace;
use std::io::ErrorKind;

/// Commit message of the PRERELEASE commit
pub fn pre_release_message(release: &SemanticVersion) -> String {
    format!("[pre-release] {}", release)
}

/// Commit message of the POSTRELEASE commit; names the release it closes out
pub fn post_release_message(release: &SemanticVersion) -> String {
    format!("[post-release] {}", release)
}

/// Where the state machine is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Pending,
    Running(Phase),
    Complete,
    Failed(Phase),
}

/// Result of a run that reached COMPLETE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub plan: ReleasePlan,
    pub tag: String,
    /// Ids of the commits created, in order
    pub commits: Vec<String>,
    /// The POSTRELEASE commit was skipped because nothing changed
    pub post_release_skipped: bool,
    pub push_command: String,
}

/// Drives PRERELEASE → RELEASE → POSTRELEASE → COMPLETE.
///
/// A failure in any phase moves to `Failed` and stops the run; the
/// repository is left as the last successful operation produced it.
pub struct ReleaseStateMachine<'a> {
    options: &'a ReleaseOptions,
    git: GitOrchestrator<'a>,
    workspace: &'a dyn Workspace,
    sink: &'a dyn ProgressSink,
    extension: &'a dyn ReleaseExtension,
    manifest: ManifestEditor,
    state: MachineState,
    plan: Option<ReleasePlan>,
    tag: Option<String>,
    commits: Vec<String>,
    post_release_skipped: bool,
}

impl<'a> ReleaseStateMachine<'a> {
    pub fn new(
        options: &'a ReleaseOptions,
        repo: &'a dyn Repository,
        workspace: &'a dyn Workspace,
        sink: &'a dyn ProgressSink,
    ) -> Result<Self> {
        let manifest = ManifestEditor::new(
            &options.declaration_pattern,
            options.manifest_file.display().to_string(),
        )?;

        Ok(ReleaseStateMachine {
            options,
            git: GitOrchestrator::new(repo, sink),
            workspace,
            sink,
            extension: &NoopExtension,
            manifest,
            state: MachineState::Pending,
            plan: None,
            tag: None,
            commits: Vec::new(),
            post_release_skipped: false,
        })
    }

    /// Plug publishing actions into the RELEASE phase
    pub fn with_extension(mut self, extension: &'a dyn ReleaseExtension) -> Self {
        self.extension = extension;
        self
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn plan(&self) -> Option<&ReleasePlan> {
        self.plan.as_ref()
    }

    /// Resolve the plan `run` would carry out, without touching the repository.
    ///
    /// Reads the manifest from the working tree, so the release branch must
    /// be checked out unless the release version is given explicitly.
    pub fn preview(&self) -> Result<(ReleasePlan, String)> {
        let options = self.options;
        let plan = match (options.resume_from, &options.release_version) {
            (Phase::PreRelease, _) => self.resolve_plan(self.checked_out_version()?)?,
            (_, Some(text)) => self.plan_from_release(SemanticVersion::parse(text.trim())?)?,
            (_, None) => self.plan_from_release(self.checked_out_version()?)?,
        };
        let tag = options.tag_pattern.format(&plan.release);
        Ok((plan, tag))
    }

    /// Version declared in the working tree, which must be on the release branch
    fn checked_out_version(&self) -> Result<SemanticVersion> {
        let expected = self.options.branches.for_phase(Phase::PreRelease);
        let current = self.git.current_branch()?;
        if current != expected {
            return Err(ReleaseError::invariant(format!(
                "dry run reads {} from the checked-out branch '{}'; check out '{}' to preview this release",
                self.options.manifest_file.display(),
                current,
                expected
            )));
        }
        let contents = self.workspace.read(&self.options.manifest_file)?;
        self.manifest.read_version(&contents)
    }

    /// Run every phase from `resume_from` to COMPLETE
    pub fn run(&mut self) -> Result<ReleaseOutcome> {
        if self.state != MachineState::Pending {
            return Err(ReleaseError::invariant(format!(
                "release state machine already ran (state {:?})",
                self.state
            )));
        }

        let mut next = Some(self.options.resume_from);
        while let Some(phase) = next {
            self.state = MachineState::Running(phase);
            self.sink.emit(&ProgressEvent::PhaseStarted(phase));

            if let Err(err) = self.execute(phase) {
                self.state = MachineState::Failed(phase);
                self.sink.emit(&ProgressEvent::PhaseFailed {
                    phase,
                    error: err.root_cause().to_string(),
                });
                return Err(err);
            }

            self.sink.emit(&ProgressEvent::PhaseCompleted(phase));
            next = phase.next();
        }

        let (plan, tag) = match (&self.plan, &self.tag) {
            (Some(plan), Some(tag)) => (plan.clone(), tag.clone()),
            _ => return Err(ReleaseError::invariant("run finished without a release plan")),
        };

        self.state = MachineState::Complete;
        let push_command = self.options.push_command(&tag);
        self.sink.emit(&ProgressEvent::Complete {
            release: plan.release.to_string(),
            tag: tag.clone(),
            push_command: push_command.clone(),
        });

        Ok(ReleaseOutcome {
            plan,
            tag,
            commits: self.commits.clone(),
            post_release_skipped: self.post_release_skipped,
            push_command,
        })
    }

    fn execute(&mut self, phase: Phase) -> Result<()> {
        match phase {
            Phase::PreRelease => self.pre_release(),
            Phase::Release => self.release(),
            Phase::PostRelease => self.post_release(),
        }
    }

    fn resolve_plan(&self, current: SemanticVersion) -> Result<ReleasePlan> {
        ReleasePlan::resolve(
            current,
            self.options.bump,
            self.options.next_version_override.as_deref(),
            &self.options.marker,
        )
    }

    /// Plan for a release version that is already known; rejects development versions
    fn plan_from_release(&self, release: SemanticVersion) -> Result<ReleasePlan> {
        ReleasePlan::from_release(
            release,
            self.options.bump,
            self.options.next_version_override.as_deref(),
            &self.options.marker,
        )
    }

    fn adopt_plan(&mut self, phase: Phase, plan: ReleasePlan) -> String {
        self.sink.emit(&ProgressEvent::VersionsResolved {
            phase,
            plan: plan.clone(),
        });
        let tag = self.options.tag_pattern.format(&plan.release);
        self.plan = Some(plan);
        self.tag = Some(tag.clone());
        tag
    }

    fn pre_release(&mut self) -> Result<()> {
        let phase = Phase::PreRelease;
        let options = self.options;

        self.git
            .switch_to(phase, options.branches.for_phase(phase))
            .phase_context(phase, "checkout release branch")?;

        let contents = self
            .workspace
            .read(&options.manifest_file)
            .phase_context(phase, "read manifest")?;
        let current = self
            .manifest
            .read_version(&contents)
            .phase_context(phase, "resolve current version")?;
        let plan = self
            .resolve_plan(current)
            .phase_context(phase, "compute release versions")?;
        let tag = self.adopt_plan(phase, plan.clone());

        // Nothing is written until the tag is known to be free.
        self.git
            .ensure_tag_absent(&tag)
            .phase_context(phase, "check release tag")?;

        if !plan.current.is_development(&options.marker) {
            return Err(ReleaseError::invariant(format!(
                "current version {} is not a -{} version",
                plan.current, options.marker
            ))
            .in_phase(phase, "resolve current version"));
        }

        // Both edits are computed before either file is written.
        let manifest = self.manifest_update(phase, &plan.release)?;
        let notes = self.notes_update(phase, &plan.release)?;
        self.write_manifest(phase, &manifest, &plan.release)?;
        self.write_notes(phase, &notes, &plan.release)?;

        self.git
            .stage(
                phase,
                &[options.manifest_file.as_path(), options.notes_file.as_path()],
            )
            .phase_context(phase, "stage release files")?;

        let commit = self
            .git
            .commit(phase, &pre_release_message(&plan.release))
            .phase_context(phase, "commit release version")?;
        self.commits.push(commit.clone());

        if let Err(err) = self.git.tag(phase, &tag) {
            self.sink.emit(&ProgressEvent::TagNeedsManualResolution {
                phase,
                tag: tag.clone(),
                commit,
            });
            return Err(err.in_phase(phase, "create release tag"));
        }

        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let phase = Phase::Release;
        let plan = self.plan_for(phase)?;
        let tag = self.tag.clone().unwrap_or_default();
        let options = self.options;

        self.sink.emit(&ProgressEvent::Note {
            phase,
            message: format!(
                "extension '{}' for {}{}",
                self.extension.name(),
                tag,
                if options.release_candidate {
                    " (release candidate)"
                } else {
                    ""
                }
            ),
        });

        let context = ReleaseContext {
            plan: &plan,
            tag: &tag,
            branches: &options.branches,
            candidate: options.release_candidate,
        };
        self.extension
            .run(&context, self.sink)
            .phase_context(phase, "run release extension")
    }

    fn post_release(&mut self) -> Result<()> {
        let phase = Phase::PostRelease;
        let plan = self.plan_for(phase)?;
        let options = self.options;

        self.git
            .switch_to(phase, options.branches.for_phase(phase))
            .phase_context(phase, "checkout development branch")?;

        let manifest = self.manifest_update(phase, &plan.next)?;
        self.write_manifest(phase, &manifest, &plan.next)?;

        self.git
            .stage(phase, &[options.manifest_file.as_path()])
            .phase_context(phase, "stage manifest")?;

        match self.git.commit(phase, &post_release_message(&plan.release)) {
            Ok(commit) => self.commits.push(commit),
            Err(err) if err.is_nothing_to_commit() => {
                self.post_release_skipped = true;
                self.sink.emit(&ProgressEvent::NothingToCommit {
                    phase,
                    version: plan.next.to_string(),
                });
            }
            Err(err) => return Err(err.in_phase(phase, "commit next development version")),
        }

        Ok(())
    }

    /// The run's plan; resumed runs derive it on first use
    fn plan_for(&mut self, phase: Phase) -> Result<ReleasePlan> {
        if let Some(plan) = &self.plan {
            return Ok(plan.clone());
        }

        let options = self.options;
        let release = match &options.release_version {
            Some(text) => {
                SemanticVersion::parse(text.trim()).phase_context(phase, "parse release version")?
            }
            None => {
                self.git
                    .switch_to(phase, options.branches.for_phase(Phase::PreRelease))
                    .phase_context(phase, "checkout release branch")?;
                let contents = self
                    .workspace
                    .read(&options.manifest_file)
                    .phase_context(phase, "read manifest")?;
                let declared = self
                    .manifest
                    .read_version(&contents)
                    .phase_context(phase, "resolve release version")?;
                if declared.is_development(&options.marker) {
                    return Err(ReleaseError::invariant(format!(
                        "release branch declares {}; pass the release version explicitly to resume",
                        declared
                    ))
                    .in_phase(phase, "resolve release version"));
                }
                declared
            }
        };

        let plan = self
            .plan_from_release(release)
            .phase_context(phase, "compute release versions")?;
        self.adopt_plan(phase, plan.clone());
        Ok(plan)
    }

    /// Manifest contents with the declaration set to `version`
    fn manifest_update(&self, phase: Phase, version: &SemanticVersion) -> Result<String> {
        let contents = self
            .workspace
            .read(&self.options.manifest_file)
            .phase_context(phase, "read manifest")?;
        self.manifest
            .set_version(&contents, version)
            .phase_context(phase, "set manifest version")
    }

    /// Write the manifest, then re-read and verify it
    fn write_manifest(&self, phase: Phase, updated: &str, version: &SemanticVersion) -> Result<()> {
        let path = &self.options.manifest_file;

        self.workspace
            .write(path, updated)
            .phase_context(phase, "write manifest")?;

        let written = self
            .workspace
            .read(path)
            .phase_context(phase, "verify manifest")?;
        self.manifest
            .verify(&written, version)
            .phase_context(phase, "verify manifest")?;

        self.sink.emit(&ProgressEvent::ManifestUpdated {
            phase,
            file: path.display().to_string(),
            version: version.to_string(),
        });
        Ok(())
    }

    /// Notes contents with the release block upserted; a missing file starts out empty
    fn notes_update(&self, phase: Phase, version: &SemanticVersion) -> Result<String> {
        let options = self.options;

        let contents = match self.workspace.read(&options.notes_file) {
            Ok(text) => text,
            Err(ReleaseError::Io(e)) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.in_phase(phase, "read release notes")),
        };

        let notes = ReleaseNotes {
            group: options.group.clone(),
            artifact: options.artifact.clone(),
            version: version.clone(),
            notes: options.notes.clone(),
        };
        upsert(
            &contents,
            &options.block_markers,
            &notes.render(&options.notes_template),
        )
        .phase_context(phase, "update release block")
    }

    fn write_notes(&self, phase: Phase, updated: &str, version: &SemanticVersion) -> Result<()> {
        let path = &self.options.notes_file;
        self.workspace
            .write(path, updated)
            .phase_context(phase, "write release notes")?;

        self.sink.emit(&ProgressEvent::NotesUpdated {
            phase,
            file: path.display().to_string(),
            version: version.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BranchPlan;
    use crate::git::MockRepository;
    use crate::ui::RecordingSink;

    #[test]
    fn test_commit_messages() {
        let release = SemanticVersion::parse("1.0.0").unwrap();
        assert_eq!(pre_release_message(&release), "[pre-release] 1.0.0");
        assert_eq!(post_release_message(&release), "[post-release] 1.0.0");
    }

    #[test]
    fn test_machine_runs_once() {
        let repo = MockRepository::new("main")
            .with_file("build.gradle", "version = '0.1.0-SNAPSHOT'\n")
            .with_file("README.md", "# demo\n");
        let sink = RecordingSink::new();
        let options = ReleaseOptions::new(BranchPlan::single("main"), "build.gradle", "README.md");
        let mut machine = ReleaseStateMachine::new(&options, &repo, &repo, &sink).unwrap();

        assert_eq!(machine.state(), MachineState::Pending);
        machine.run().unwrap();
        assert_eq!(machine.state(), MachineState::Complete);
        assert!(matches!(
            machine.run(),
            Err(ReleaseError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let repo = MockRepository::new("main")
            .with_file("build.gradle", "version = '0.1.0-SNAPSHOT'\n");
        let sink = RecordingSink::new();
        let options = ReleaseOptions::new(BranchPlan::single("main"), "build.gradle", "README.md");
        let machine = ReleaseStateMachine::new(&options, &repo, &repo, &sink).unwrap();

        let (plan, tag) = machine.preview().unwrap();
        assert_eq!(plan.release.to_string(), "0.1.0");
        assert_eq!(plan.next.to_string(), "0.1.1-SNAPSHOT");
        assert_eq!(tag, "releases/v0.1.0");
        assert_eq!(repo.commits("main").len(), 2);
        assert!(repo.tags().is_empty());
        assert!(sink.lines().is_empty());
    }
}
