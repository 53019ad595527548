//! Pure text transforms applied to the manifest and notes files

pub mod manifest;
pub mod release_block;

pub use manifest::ManifestEditor;
pub use release_block::{upsert, BlockMarkers, ReleaseNotes};
