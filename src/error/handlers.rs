//! Error handlers
//!
//! Logs resolution failures before they are collapsed to `Unresolved`.

use crate::error::types::ResolveError;
use log::{debug, warn};

/// Handle a resolution error for `identifier`
///
/// Expected outcomes (cloud providers, dead paths) are logged at debug level,
/// service failures at warn level.
pub fn handle_error(identifier: &str, err: &ResolveError) {
    match err {
        ResolveError::QueryFailure(_) => {
            warn!("Could not resolve {} [{}]: {}", identifier, error_kind(err), err)
        }
        _ => debug!("Could not resolve {} [{}]: {}", identifier, error_kind(err), err),
    }
}

/// Short label for an error kind, used in log lines
pub fn error_kind(err: &ResolveError) -> &'static str {
    match err {
        ResolveError::MalformedIdentifier(_) => "malformed-identifier",
        ResolveError::UnsupportedProvider(_) => "unsupported-provider",
        ResolveError::QueryFailure(_) => "query-failure",
        ResolveError::PathNotFound(_) => "path-not-found",
    }
}
