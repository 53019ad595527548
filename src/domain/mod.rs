//! Domain logic - pure release rules independent of git and the filesystem

pub mod branch;
pub mod phase;
pub mod plan;
pub mod tag;
pub mod version;

pub use branch::BranchPlan;
pub use phase::Phase;
pub use plan::ReleasePlan;
pub use tag::TagPattern;
pub use version::{SemanticVersion, VersionBump};
