pub mod cli;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod git;
pub mod hooks;
pub mod release;
pub mod ui;
pub mod workspace;

pub use error::{ReleaseError, Result};
