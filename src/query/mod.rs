//! Content-query collaborator
//!
//! The row-query capability the resolver depends on, plus an in-memory
//! implementation used by the probe binary and the tests.

mod memory;
mod service;

pub use memory::{Fixture, FixtureRow, MemoryContentService};
pub use service::{ContentQueryService, Cursor, DATA_COLUMN, ID_SELECTION, QueryRequest, Row};
