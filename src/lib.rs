//! URI path resolver
//!
//! Translates provider-scoped resource identifiers (`file://` and `content://`
//! links as handed out by a mobile content-access layer) into local filesystem
//! paths, falling back to the original identifier when no existing path can be
//! determined.

pub mod config;
pub mod error;
pub mod query;
pub mod resolver;
pub mod storage;
pub mod uri;
pub mod utils;

pub use config::ResolverConfig;
pub use error::{QueryError, ResolveError};
pub use query::{ContentQueryService, MemoryContentService};
pub use resolver::{PathResolver, ResolutionResult, resolve, resolve_with_timeout};
pub use storage::{LocalFilesystem, PathProbe};
