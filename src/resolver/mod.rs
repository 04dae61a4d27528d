//! URI path resolver
//!
//! Turns a resource identifier into a local filesystem path, or hands the
//! identifier back when no existing path can be determined.

pub mod bounded;
mod data_column;
mod operations;
mod providers;
mod results;

pub use bounded::resolve_with_timeout;
pub use data_column::query_data_column;
pub use operations::{PathResolver, resolve};
pub use providers::{ProviderContext, ProviderHandler, ProviderTable};
pub use results::ResolutionResult;
