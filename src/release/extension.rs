use crate::domain::{BranchPlan, ReleasePlan};
use crate::error::Result;
use crate::ui::ProgressSink;

/// What a RELEASE phase extension gets to see
#[derive(Debug, Clone, Copy)]
pub struct ReleaseContext<'a> {
    pub plan: &'a ReleasePlan,
    pub tag: &'a str,
    pub branches: &'a BranchPlan,
    /// The release is a candidate rather than final
    pub candidate: bool,
}

/// Publishing actions run during the RELEASE phase.
///
/// The state machine always enters and leaves RELEASE; what happens inside
/// is up to the extension. An error aborts the run before POSTRELEASE.
pub trait ReleaseExtension {
    fn name(&self) -> &str;
    fn run(&self, context: &ReleaseContext<'_>, sink: &dyn ProgressSink) -> Result<()>;
}

/// Extension that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExtension;

impl ReleaseExtension for NoopExtension {
    fn name(&self) -> &str {
        "none"
    }

    fn run(&self, _context: &ReleaseContext<'_>, _sink: &dyn ProgressSink) -> Result<()> {
        Ok(())
    }
}
