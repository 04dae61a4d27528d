//! Time-bounded resolution
//!
//! The resolver itself never times out. Callers that need bounded latency
//! run it here, on the blocking pool, under a deadline.

use log::warn;
use std::sync::Arc;
use std::time::Duration;

use super::operations::PathResolver;
use super::results::ResolutionResult;
use crate::query::ContentQueryService;
use crate::storage::PathProbe;

/// Resolves `identifier` within `timeout`.
///
/// On timeout the identifier comes back `Unresolved`; the blocking call keeps
/// running to completion in the background and its result is dropped.
pub async fn resolve_with_timeout<P>(
    resolver: Arc<PathResolver<P>>,
    service: Arc<dyn ContentQueryService + Send + Sync>,
    identifier: String,
    timeout: Duration,
) -> ResolutionResult
where
    P: PathProbe + Send + Sync + 'static,
{
    let fallback = identifier.clone();
    let task = tokio::task::spawn_blocking(move || resolver.resolve(&identifier, &*service));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!("Resolution task for {} failed: {}", fallback, e);
            ResolutionResult::Unresolved(fallback)
        }
        Err(_) => {
            warn!("Resolution of {} timed out after {:?}", fallback, timeout);
            ResolutionResult::Unresolved(fallback)
        }
    }
}
