//! Error types
//!
//! Defines the failure kinds a resolution attempt can hit. None of them reach the
//! caller of `PathResolver::resolve`; they are logged and collapsed to `Unresolved`.

use std::fmt;

/// Content-query service errors
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    UnknownCollection(String),
    UnsupportedSelection(String),
    MissingColumn(String),
    Backend(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownCollection(c) => write!(f, "Unknown collection: {}", c),
            QueryError::UnsupportedSelection(s) => write!(f, "Unsupported selection: {}", s),
            QueryError::MissingColumn(c) => write!(f, "Missing column: {}", c),
            QueryError::Backend(msg) => write!(f, "Query backend error: {}", msg),
        }
    }
}

impl std::error::Error for QueryError {}

/// Resolution errors
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The identifier or its document id could not be parsed.
    MalformedIdentifier(String),
    /// The authority has no mapping rule, or is a cloud-only provider.
    UnsupportedProvider(String),
    /// The service failed, or returned no usable `_data` value.
    QueryFailure(String),
    /// A candidate path was produced but does not exist on disk.
    PathNotFound(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::MalformedIdentifier(s) => write!(f, "Malformed identifier: {}", s),
            ResolveError::UnsupportedProvider(a) => write!(f, "Unsupported provider: {}", a),
            ResolveError::QueryFailure(s) => write!(f, "Query failure: {}", s),
            ResolveError::PathNotFound(p) => write!(f, "Path not found: {}", p),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<QueryError> for ResolveError {
    fn from(error: QueryError) -> Self {
        ResolveError::QueryFailure(error.to_string())
    }
}
