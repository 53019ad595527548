//! Script hook for the RELEASE phase
//!
//! Lets a project run its own publish step (upload artifacts, trigger a
//! deploy) between the release commit and the next development version.

pub mod executor;
pub mod lifecycle;

pub use executor::{HookExecutor, ScriptHook};
pub use lifecycle::HookContext;
