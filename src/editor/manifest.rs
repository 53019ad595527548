use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};
use regex::Regex;

/// Matches `version = '1.0.0'` or `version = "1.0.0"` on its own line
pub const DEFAULT_DECLARATION_PATTERN: &str =
    r#"(?m)^\s*version\s*=\s*['"](?P<version>[^'"\r\n]*)['"]\s*$"#;

/// Reads and rewrites the single version declaration of a manifest file
#[derive(Debug, Clone)]
pub struct ManifestEditor {
    pattern: Regex,
    file_label: String,
}

impl ManifestEditor {
    /// Build an editor from a declaration regex.
    ///
    /// The regex must define a capture group named `version`.
    pub fn new(pattern: &str, file_label: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            ReleaseError::config(format!("Invalid version declaration pattern: {}", e))
        })?;
        if !pattern.capture_names().any(|name| name == Some("version")) {
            return Err(ReleaseError::config(
                "Version declaration pattern needs a capture group named 'version'",
            ));
        }
        Ok(ManifestEditor {
            pattern,
            file_label: file_label.into(),
        })
    }

    /// Editor using the default assignment-style pattern
    pub fn with_default_pattern(file_label: impl Into<String>) -> Self {
        ManifestEditor {
            pattern: Regex::new(DEFAULT_DECLARATION_PATTERN).expect("default pattern is valid"),
            file_label: file_label.into(),
        }
    }

    /// Byte range of the declared version value
    fn locate(&self, contents: &str) -> Result<std::ops::Range<usize>> {
        let mut ranges = self
            .pattern
            .captures_iter(contents)
            .filter_map(|caps| caps.name("version").map(|m| m.range()));

        match (ranges.next(), ranges.next()) {
            (Some(range), None) => Ok(range),
            (None, _) => Err(self.not_found(0)),
            (Some(_), Some(_)) => Err(self.not_found(2 + ranges.count())),
        }
    }

    fn not_found(&self, matches: usize) -> ReleaseError {
        ReleaseError::VersionDeclarationNotFound {
            file: self.file_label.clone(),
            matches,
        }
    }

    /// Parse the declared version
    pub fn read_version(&self, contents: &str) -> Result<SemanticVersion> {
        let range = self.locate(contents)?;
        SemanticVersion::parse(&contents[range])
    }

    /// Replace the declared value with `version`, leaving every other byte intact
    pub fn set_version(&self, contents: &str, version: &SemanticVersion) -> Result<String> {
        let range = self.locate(contents)?;
        let mut updated = String::with_capacity(contents.len() + 16);
        updated.push_str(&contents[..range.start]);
        updated.push_str(&version.to_string());
        updated.push_str(&contents[range.end..]);
        Ok(updated)
    }

    /// Confirm that re-read contents declare exactly `version`
    pub fn verify(&self, contents: &str, version: &SemanticVersion) -> Result<()> {
        let expected = version.to_string();
        let declared = self
            .locate(contents)
            .ok()
            .map(|range| &contents[range]);

        if declared == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(ReleaseError::VerificationFailed {
                file: self.file_label.clone(),
                version: expected,
            })
        }
    }
}
