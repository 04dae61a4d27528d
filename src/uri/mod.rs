//! Resource identifier parsing
//!
//! Splits opaque resource identifiers into scheme, authority and path, and
//! extracts document ids from structured document paths.

mod collection;
mod document;
mod parser;

pub use collection::ContentUri;
pub use document::{DocumentId, document_id_from_path};
pub use parser::{CONTENT_SCHEME, FILE_SCHEME, ResourceIdentifier};
