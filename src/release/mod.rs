//! The release version state machine and its inputs

pub mod extension;
pub mod machine;
pub mod options;

pub use extension::{NoopExtension, ReleaseContext, ReleaseExtension};
pub use machine::{
    post_release_message, pre_release_message, MachineState, ReleaseOutcome,
    ReleaseStateMachine,
};
pub use options::ReleaseOptions;
