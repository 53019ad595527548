//! User interface module - progress reporting and prompts.
//!
//! Separates concerns:
//! - `formatter` - Console rendering of progress events and messages
//! - This module - Progress events, sinks, and interactive prompts

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

use anyhow::Result;

use crate::domain::{Phase, ReleasePlan};
use crate::git::short_id;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{display_error, display_plan, display_status, display_success, ConsoleSink};

/// One observable step of a release run.
///
/// `Display` renders a single structured line prefixed with the phase.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    PhaseStarted(Phase),
    PhaseCompleted(Phase),
    PhaseFailed {
        phase: Phase,
        error: String,
    },
    VersionsResolved {
        phase: Phase,
        plan: ReleasePlan,
    },
    CheckedOut {
        phase: Phase,
        branch: String,
    },
    ManifestUpdated {
        phase: Phase,
        file: String,
        version: String,
    },
    NotesUpdated {
        phase: Phase,
        file: String,
        version: String,
    },
    Staged {
        phase: Phase,
        files: Vec<String>,
    },
    Committed {
        phase: Phase,
        id: String,
        message: String,
    },
    NothingToCommit {
        phase: Phase,
        version: String,
    },
    Tagged {
        phase: Phase,
        tag: String,
    },
    /// The release commit exists but its tag could not be created
    TagNeedsManualResolution {
        phase: Phase,
        tag: String,
        commit: String,
    },
    Note {
        phase: Phase,
        message: String,
    },
    Complete {
        release: String,
        tag: String,
        push_command: String,
    },
}

impl ProgressEvent {
    /// Whether this event reports a mutation or success (rendered with a check mark)
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            ProgressEvent::ManifestUpdated { .. }
                | ProgressEvent::NotesUpdated { .. }
                | ProgressEvent::Committed { .. }
                | ProgressEvent::Tagged { .. }
                | ProgressEvent::PhaseCompleted(_)
                | ProgressEvent::Complete { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ProgressEvent::PhaseFailed { .. } | ProgressEvent::TagNeedsManualResolution { .. }
        )
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::PhaseStarted(phase) => write!(f, "[{}] started", phase),
            ProgressEvent::PhaseCompleted(phase) => write!(f, "[{}] completed", phase),
            ProgressEvent::PhaseFailed { phase, error } => {
                write!(f, "[{}] failed: {}", phase, error)
            }
            ProgressEvent::VersionsResolved { phase, plan } => write!(
                f,
                "[{}] versions current={} release={} next={}",
                phase, plan.current, plan.release, plan.next
            ),
            ProgressEvent::CheckedOut { phase, branch } => {
                write!(f, "[{}] on branch {}", phase, branch)
            }
            ProgressEvent::ManifestUpdated {
                phase,
                file,
                version,
            } => write!(f, "[{}] set version {} in {}", phase, version, file),
            ProgressEvent::NotesUpdated {
                phase,
                file,
                version,
            } => write!(f, "[{}] updated release block for {} in {}", phase, version, file),
            ProgressEvent::Staged { phase, files } => {
                write!(f, "[{}] staged {}", phase, files.join(", "))
            }
            ProgressEvent::Committed { phase, id, message } => {
                write!(f, "[{}] committed {} \"{}\"", phase, short_id(id), message)
            }
            ProgressEvent::NothingToCommit { phase, version } => write!(
                f,
                "[{}] nothing to commit, development version already {}",
                phase, version
            ),
            ProgressEvent::Tagged { phase, tag } => write!(f, "[{}] tagged {}", phase, tag),
            ProgressEvent::TagNeedsManualResolution { phase, tag, commit } => write!(
                f,
                "[{}] commit {} succeeded but tag {} was not created; resolve manually",
                phase,
                short_id(commit),
                tag
            ),
            ProgressEvent::Note { phase, message } => write!(f, "[{}] {}", phase, message),
            ProgressEvent::Complete {
                release,
                tag,
                push_command,
            } => write!(
                f,
                "[COMPLETE] released {} as {}; nothing was pushed, run: {}",
                release, tag, push_command
            ),
        }
    }
}

/// Destination for progress lines supplied by the caller
pub trait ProgressSink {
    fn emit(&self, event: &ProgressEvent);
}

/// Sink that keeps events for later inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.borrow().clone()
    }

    /// Rendered lines, in emission order
    pub fn lines(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.to_string()).collect()
    }

    /// Whether any rendered line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|e| e.to_string().contains(needle))
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: &ProgressEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive). Default is "no".
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
