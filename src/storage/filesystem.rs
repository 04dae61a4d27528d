//! File system probes
//!
//! Answers whether a candidate path denotes an existing filesystem entry.

use std::io::Result;
use std::path::Path;

/// Existence check collaborator
pub trait PathProbe {
    /// Whether `path` names an existing entry (file, directory, or anything else)
    fn exists(&self, path: &Path) -> Result<bool>;
}

/// Probe backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl PathProbe for LocalFilesystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists()
    }
}

impl<P: PathProbe + ?Sized> PathProbe for &P {
    fn exists(&self, path: &Path) -> Result<bool> {
        (**self).exists(path)
    }
}
