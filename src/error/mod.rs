//! Error handling
//!
//! Defines error types and handling for URI path resolution.

pub mod handlers;
pub mod types;

pub use types::*;
