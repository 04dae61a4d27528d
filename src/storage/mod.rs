//! Filesystem access
//!
//! Existence checks used as the last gate of a resolution.

pub mod filesystem;

pub use filesystem::{LocalFilesystem, PathProbe};
