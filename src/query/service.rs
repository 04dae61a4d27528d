//! Content-query service contract

use std::collections::BTreeMap;

use crate::error::QueryError;
use crate::uri::{ContentUri, ResourceIdentifier, document_id_from_path};

/// Column holding a row's underlying filesystem path
pub const DATA_COLUMN: &str = "_data";

/// Selection filter matching a single row id
pub const ID_SELECTION: &str = "_id=?";

/// One row query against a collection
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    pub collection: &'a ContentUri,
    pub projection: &'a [&'a str],
    pub selection: Option<&'a str>,
    pub selection_args: &'a [String],
}

/// A result set handle held by the service.
///
/// Whatever the service holds for the cursor is released when the cursor is
/// dropped.
pub trait Cursor {
    /// Moves to the first row, false when the result set is empty
    fn move_to_first(&mut self) -> bool;

    /// Index of `column` in the projection, `None` when the column is absent
    fn column_index(&self, column: &str) -> Option<usize>;

    /// Value at `index` in the current row
    fn get_string(&self, index: usize) -> Result<Option<String>, QueryError>;
}

/// The projected columns of a single row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: BTreeMap<String, Option<String>>,
}

impl Row {
    pub fn insert(&mut self, column: &str, value: Option<String>) {
        self.columns.insert(column.to_string(), value);
    }

    /// Value of `column`, `None` when absent or null
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(|v| v.as_deref())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }
}

/// The platform's content-access layer, as seen by the resolver.
pub trait ContentQueryService {
    /// Opens a cursor over the rows of `request.collection` matching the selection.
    ///
    /// `Ok(None)` means the service had nothing to return (no cursor at all).
    fn query(&self, request: &QueryRequest<'_>)
    -> Result<Option<Box<dyn Cursor + '_>>, QueryError>;

    /// Whether the provider attests `identifier` as a structured document
    fn is_structured_document(&self, identifier: &ResourceIdentifier) -> bool;

    fn document_id(&self, identifier: &ResourceIdentifier) -> Option<String> {
        document_id_from_path(identifier)
    }

    fn authority(&self, identifier: &ResourceIdentifier) -> Option<String> {
        identifier.authority().map(str::to_string)
    }

    /// Reads the projected columns of the first matching row.
    ///
    /// The cursor lives only inside this call and is dropped on every return
    /// path, including `?` exits. Projected columns the cursor does not carry
    /// are left out of the row.
    fn query_row(
        &self,
        collection: &ContentUri,
        projection: &[&str],
        selection: Option<&str>,
        selection_args: &[String],
    ) -> Result<Option<Row>, QueryError> {
        let request = QueryRequest {
            collection,
            projection,
            selection,
            selection_args,
        };

        let Some(mut cursor) = self.query(&request)? else {
            return Ok(None);
        };

        if !cursor.move_to_first() {
            return Ok(None);
        }

        let mut row = Row::default();
        for column in projection {
            if let Some(index) = cursor.column_index(column) {
                row.insert(column, cursor.get_string(index)?);
            }
        }

        Ok(Some(row))
    }
}
