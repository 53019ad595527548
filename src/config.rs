use crate::domain::tag::DEFAULT_TAG_PATTERN;
use crate::domain::version::DEFAULT_DEVELOPMENT_MARKER;
use crate::domain::{TagPattern, VersionBump};
use crate::editor::manifest::DEFAULT_DECLARATION_PATTERN;
use crate::editor::release_block::{DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER, DEFAULT_TEMPLATE};
use crate::editor::ManifestEditor;
use crate::error::{ReleaseError, Result};
use crate::git::Backend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the repository root and the user config directory
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Represents the complete configuration for git-release.
///
/// Built once per run and passed by reference; nothing reads it from ambient state.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub hooks: HooksConfig,
}

fn default_development_branch() -> String {
    "main".to_string()
}

/// Development and release branches; `release` falls back to `development`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_development_branch")]
    pub development: String,

    #[serde(default)]
    pub release: Option<String>,
}

impl BranchesConfig {
    pub fn release_branch(&self) -> &str {
        self.release.as_deref().unwrap_or(&self.development)
    }
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            development: default_development_branch(),
            release: None,
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("build.gradle")
}

fn default_notes_file() -> PathBuf {
    PathBuf::from("README.md")
}

/// Files mutated by a release, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_notes_file")]
    pub notes: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            manifest: default_manifest(),
            notes: default_notes_file(),
        }
    }
}

fn default_marker() -> String {
    DEFAULT_DEVELOPMENT_MARKER.to_string()
}

fn default_declaration() -> String {
    DEFAULT_DECLARATION_PATTERN.to_string()
}

fn default_tag_pattern() -> String {
    DEFAULT_TAG_PATTERN.to_string()
}

/// Version handling: development marker, default bump, declaration regex, tag pattern.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionConfig {
    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default)]
    pub bump: VersionBump,

    /// Regex with a `version` capture group matching exactly one line
    #[serde(default = "default_declaration")]
    pub declaration: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            marker: default_marker(),
            bump: VersionBump::default(),
            declaration: default_declaration(),
            tag_pattern: default_tag_pattern(),
        }
    }
}

fn default_begin_marker() -> String {
    DEFAULT_BEGIN_MARKER.to_string()
}

fn default_end_marker() -> String {
    DEFAULT_END_MARKER.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

/// Release block markers, coordinates, and template.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotesConfig {
    #[serde(default = "default_begin_marker")]
    pub begin_marker: String,

    #[serde(default = "default_end_marker")]
    pub end_marker: String,

    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub artifact: String,

    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        NotesConfig {
            begin_marker: default_begin_marker(),
            end_marker: default_end_marker(),
            group: String::new(),
            artifact: String::new(),
            template: default_template(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Only used in the printed push instruction
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            backend: Backend::default(),
            remote: default_remote(),
        }
    }
}

/// Optional scripts; `release` runs during the RELEASE phase.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    #[serde(default)]
    pub release: Option<PathBuf>,
}

impl Config {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| ReleaseError::config(format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the release run could not work with
    pub fn validate(&self) -> Result<()> {
        if self.branches.development.trim().is_empty() {
            return Err(ReleaseError::config("Development branch must not be empty"));
        }
        if self.branches.release_branch().trim().is_empty() {
            return Err(ReleaseError::config("Release branch must not be empty"));
        }

        let marker = self.version.marker.as_str();
        if marker.is_empty() || semver::Prerelease::new(marker).is_err() {
            return Err(ReleaseError::config(format!(
                "Development marker '{}' is not a valid prerelease identifier",
                marker
            )));
        }

        ManifestEditor::new(&self.version.declaration, "manifest")?;
        TagPattern::new(self.version.tag_pattern.clone())?;

        let notes = &self.notes;
        if notes.begin_marker.is_empty() || notes.end_marker.is_empty() {
            return Err(ReleaseError::config("Release block markers must not be empty"));
        }
        if notes.begin_marker == notes.end_marker {
            return Err(ReleaseError::config(
                "Release block begin and end markers must differ",
            ));
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the repository root
/// 3. `<config dir>/git-release/release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed, or validated
pub fn load_config(config_path: Option<&Path>, repo_root: &Path) -> Result<Config> {
    let candidate = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if repo_root.join(CONFIG_FILE_NAME).exists() {
        Some(repo_root.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join("git-release").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    };

    match candidate {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&text)
        }
        None => Ok(Config::default()),
    }
}
