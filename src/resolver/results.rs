//! Result types for resolve operations

use std::fmt;

/// Outcome of one resolution call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// An existing filesystem path
    Resolved(String),
    /// No path could be determined; carries the identifier unchanged so the
    /// caller can fall back to reading through the identifier itself
    Unresolved(String),
}

impl ResolutionResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionResult::Resolved(_))
    }

    /// The resolved path, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            ResolutionResult::Resolved(path) => Some(path),
            ResolutionResult::Unresolved(_) => None,
        }
    }

    /// The path when resolved, otherwise the original identifier
    pub fn into_path_or_identifier(self) -> String {
        match self {
            ResolutionResult::Resolved(value) | ResolutionResult::Unresolved(value) => value,
        }
    }
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionResult::Resolved(path) => write!(f, "resolved {}", path),
            ResolutionResult::Unresolved(identifier) => write!(f, "unresolved {}", identifier),
        }
    }
}
