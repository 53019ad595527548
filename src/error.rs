use crate::domain::Phase;
use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Malformed version '{input}': expected MAJOR.MINOR.PATCH[-MARKER]")]
    MalformedVersion { input: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Version declaration not found in {file}: expected exactly one match, found {matches}")]
    VersionDeclarationNotFound { file: String, matches: usize },

    #[error("Verification failed: {file} does not declare version {version} after rewrite")]
    VerificationFailed { file: String, version: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Git command failed: {command}\n{output}")]
    GitCommandFailed { command: String, output: String },

    #[error("Nothing to commit: {0}")]
    NothingToCommit(String),

    #[error("Tag already exists: {0}")]
    TagAlreadyExists(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{phase} failed during '{operation}': {source}")]
    Phase {
        phase: Phase,
        operation: String,
        source: Box<ReleaseError>,
    },
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an invariant violation with context
    pub fn invariant(msg: impl Into<String>) -> Self {
        ReleaseError::InvariantViolation(msg.into())
    }

    /// Create a malformed document error with context
    pub fn malformed_document(msg: impl Into<String>) -> Self {
        ReleaseError::MalformedDocument(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        ReleaseError::Hook(msg.into())
    }

    /// Create a git failure carrying the attempted command and raw output
    pub fn git(command: impl Into<String>, output: impl Into<String>) -> Self {
        ReleaseError::GitCommandFailed {
            command: command.into(),
            output: output.into(),
        }
    }

    /// Attach the phase and operation that produced this error.
    ///
    /// An error that already carries a phase is returned unchanged so the
    /// innermost operation wins.
    pub fn in_phase(self, phase: Phase, operation: impl Into<String>) -> Self {
        match self {
            already @ ReleaseError::Phase { .. } => already,
            other => ReleaseError::Phase {
                phase,
                operation: operation.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error kind underneath any phase wrapper
    pub fn root_cause(&self) -> &ReleaseError {
        match self {
            ReleaseError::Phase { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The phase this error was raised in, if known
    pub fn phase(&self) -> Option<Phase> {
        match self {
            ReleaseError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    pub fn is_nothing_to_commit(&self) -> bool {
        matches!(self.root_cause(), ReleaseError::NothingToCommit(_))
    }
}

/// Adds phase context to fallible operations inside the release state machine
pub trait PhaseContext<T> {
    fn phase_context(self, phase: Phase, operation: &str) -> Result<T>;
}

impl<T, E> PhaseContext<T> for std::result::Result<T, E>
where
    E: Into<ReleaseError>,
{
    fn phase_context(self, phase: Phase, operation: &str) -> Result<T> {
        self.map_err(|e| e.into().in_phase(phase, operation))
    }
}
