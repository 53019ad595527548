use crate::config::Config;
use crate::domain::version::DEFAULT_DEVELOPMENT_MARKER;
use crate::domain::{BranchPlan, Phase, TagPattern, VersionBump};
use crate::editor::manifest::DEFAULT_DECLARATION_PATTERN;
use crate::editor::release_block::DEFAULT_TEMPLATE;
use crate::editor::BlockMarkers;
use crate::error::Result;
use std::path::PathBuf;

/// Everything a release run needs, resolved before the first phase starts
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    pub branches: BranchPlan,
    /// Manifest path relative to the repository root
    pub manifest_file: PathBuf,
    /// Notes file path relative to the repository root
    pub notes_file: PathBuf,
    pub declaration_pattern: String,
    pub marker: String,
    pub bump: VersionBump,
    pub next_version_override: Option<String>,
    pub release_candidate: bool,
    pub tag_pattern: TagPattern,
    pub block_markers: BlockMarkers,
    pub notes_template: String,
    pub group: String,
    pub artifact: String,
    /// Free-form text rendered into the release block
    pub notes: Option<String>,
    /// First phase to run; later phases resume an interrupted run
    pub resume_from: Phase,
    /// Release version for resumed runs
    pub release_version: Option<String>,
    /// Remote named in the final push instruction
    pub remote: String,
}

impl ReleaseOptions {
    pub fn new(
        branches: BranchPlan,
        manifest_file: impl Into<PathBuf>,
        notes_file: impl Into<PathBuf>,
    ) -> Self {
        ReleaseOptions {
            branches,
            manifest_file: manifest_file.into(),
            notes_file: notes_file.into(),
            declaration_pattern: DEFAULT_DECLARATION_PATTERN.to_string(),
            marker: DEFAULT_DEVELOPMENT_MARKER.to_string(),
            bump: VersionBump::default(),
            next_version_override: None,
            release_candidate: false,
            tag_pattern: TagPattern::default(),
            block_markers: BlockMarkers::default(),
            notes_template: DEFAULT_TEMPLATE.to_string(),
            group: String::new(),
            artifact: String::new(),
            notes: None,
            resume_from: Phase::PreRelease,
            release_version: None,
            remote: "origin".to_string(),
        }
    }

    /// Options as described by a validated configuration file
    pub fn from_config(config: &Config) -> Result<Self> {
        let branches = BranchPlan::new(
            config.branches.development.clone(),
            config.branches.release_branch().to_string(),
        );

        Ok(ReleaseOptions {
            declaration_pattern: config.version.declaration.clone(),
            marker: config.version.marker.clone(),
            bump: config.version.bump,
            tag_pattern: TagPattern::new(config.version.tag_pattern.clone())?,
            block_markers: BlockMarkers::new(
                config.notes.begin_marker.clone(),
                config.notes.end_marker.clone(),
            ),
            notes_template: config.notes.template.clone(),
            group: config.notes.group.clone(),
            artifact: config.notes.artifact.clone(),
            remote: config.git.remote.clone(),
            ..ReleaseOptions::new(
                branches,
                config.files.manifest.clone(),
                config.files.notes.clone(),
            )
        })
    }

    /// `git push` command covering the touched branches and the release tag
    pub fn push_command(&self, tag: &str) -> String {
        format!(
            "git push {} {} {}",
            self.remote,
            self.branches.touched().join(" "),
            tag
        )
    }
}
