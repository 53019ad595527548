use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};

pub const DEFAULT_BEGIN_MARKER: &str = "<!-- release-block:begin -->";
pub const DEFAULT_END_MARKER: &str = "<!-- release-block:end -->";

/// Default body of the release block: a fenced dependency coordinate
pub const DEFAULT_TEMPLATE: &str =
    "\n```groovy\nimplementation '{group}:{artifact}:{version}'\n```\n{notes}";

/// Literal strings delimiting the release block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMarkers {
    pub begin: String,
    pub end: String,
}

impl BlockMarkers {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        BlockMarkers {
            begin: begin.into(),
            end: end.into(),
        }
    }
}

impl Default for BlockMarkers {
    fn default() -> Self {
        BlockMarkers::new(DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER)
    }
}

/// Release metadata rendered into the block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub group: String,
    pub artifact: String,
    pub version: SemanticVersion,
    pub notes: Option<String>,
}

impl ReleaseNotes {
    /// Render the block body from a template.
    ///
    /// Placeholders: `{group}`, `{artifact}`, `{version}`, `{notes}`. Notes
    /// are emitted followed by a newline, or as nothing when absent.
    pub fn render(&self, template: &str) -> String {
        let notes = match self.notes.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => format!("{}\n", text),
            _ => String::new(),
        };
        template
            .replace("{group}", &self.group)
            .replace("{artifact}", &self.artifact)
            .replace("{version}", &self.version.to_string())
            .replace("{notes}", &notes)
    }
}

/// Insert or replace the delimited release block in `contents`.
///
/// With both markers present everything strictly between them becomes
/// `block`. Without a begin marker the block is appended, separated from
/// existing text by one blank line. A begin marker with no end marker after
/// it, or a second begin marker after the block, is `MalformedDocument`.
pub fn upsert(contents: &str, markers: &BlockMarkers, block: &str) -> Result<String> {
    let Some(begin_at) = contents.find(&markers.begin) else {
        return Ok(append_block(contents, markers, block));
    };

    let body_start = begin_at + markers.begin.len();
    let body_len = contents[body_start..].find(&markers.end).ok_or_else(|| {
        ReleaseError::malformed_document(format!(
            "found '{}' without a following '{}'",
            markers.begin, markers.end
        ))
    })?;
    let body_end = body_start + body_len;

    let rest = &contents[body_end + markers.end.len()..];
    if rest.contains(&markers.begin) {
        return Err(ReleaseError::malformed_document(format!(
            "more than one '{}' block",
            markers.begin
        )));
    }

    let mut updated = String::with_capacity(contents.len() + block.len());
    updated.push_str(&contents[..body_start]);
    updated.push_str(block);
    updated.push_str(&contents[body_end..]);
    Ok(updated)
}

fn append_block(contents: &str, markers: &BlockMarkers, block: &str) -> String {
    let mut updated = String::with_capacity(contents.len() + block.len() + 64);
    updated.push_str(contents);

    if !contents.is_empty() && !contents.ends_with("\n\n") {
        if !contents.ends_with('\n') {
            updated.push('\n');
        }
        updated.push('\n');
    }

    updated.push_str(&markers.begin);
    updated.push_str(block);
    updated.push_str(&markers.end);
    updated.push('\n');
    updated
}
