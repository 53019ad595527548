use crate::domain::version::SemanticVersion;
use crate::error::{ReleaseError, Result};

/// Pattern used for release tags
pub const DEFAULT_TAG_PATTERN: &str = "releases/v{version}";

/// Tag naming pattern (e.g., "releases/v{version}", "v{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pattern: String,
}

impl TagPattern {
    /// Create a tag pattern; it must contain the `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains("{version}") {
            return Err(ReleaseError::config(format!(
                "Tag pattern '{}' must contain {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="releases/v{version}", version="1.2.3" -> "releases/v1.2.3"
    pub fn format(&self, version: &SemanticVersion) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: DEFAULT_TAG_PATTERN.to_string(),
        }
    }
}
