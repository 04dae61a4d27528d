//! In-memory content-query service
//!
//! Serves rows from a fixture so provider rules can be exercised away from a
//! device. Counts the queries it answers and the cursors still open, which is
//! what the leak and zero-query checks in the tests look at.

use config::{Config, ConfigError, File};
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::service::{ContentQueryService, Cursor, ID_SELECTION, QueryRequest};
use crate::config::{DOWNLOADS_AUTHORITY, EXTERNAL_STORAGE_AUTHORITY, MEDIA_AUTHORITY};
use crate::error::QueryError;
use crate::uri::{ResourceIdentifier, document_id_from_path};

const CONTENT_PREFIX: &str = "content://";

/// Fixture file layout
///
/// ```toml
/// document_authorities = ["com.android.providers.downloads.documents"]
///
/// [[rows]]
/// collection = "content://downloads/public_downloads"
/// id = "42"
/// columns = { _data = "/storage/emulated/0/Download/report.pdf" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub document_authorities: Vec<String>,
    #[serde(default)]
    pub rows: Vec<FixtureRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRow {
    pub collection: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

impl FixtureRow {
    /// Whether this row answers `request`.
    ///
    /// A row stored under collection `C` with id `N` also answers an
    /// unfiltered query against the row reference `C/N`.
    fn matches(&self, request: &QueryRequest<'_>) -> Result<bool, QueryError> {
        let target = request.collection.as_str();

        match request.selection {
            None => {
                if self.collection == target {
                    return Ok(true);
                }
                Ok(self.id.as_deref().is_some_and(|id| {
                    format!("{}/{}", self.collection.trim_end_matches('/'), id) == target
                }))
            }
            Some(selection) if is_id_selection(selection) => {
                let wanted = request.selection_args.first().ok_or_else(|| {
                    QueryError::UnsupportedSelection(format!("{} without an argument", selection))
                })?;
                Ok(self.collection == target && self.id.as_deref() == Some(wanted.as_str()))
            }
            Some(selection) => Err(QueryError::UnsupportedSelection(selection.to_string())),
        }
    }
}

fn is_id_selection(selection: &str) -> bool {
    let compact: String = selection.chars().filter(|c| !c.is_whitespace()).collect();
    compact.eq_ignore_ascii_case(ID_SELECTION)
}

/// Fixture-backed `ContentQueryService`
#[derive(Debug, Default)]
pub struct MemoryContentService {
    document_authorities: HashSet<String>,
    rows: Vec<FixtureRow>,
    failure: Option<String>,
    queries: AtomicUsize,
    open_cursors: AtomicUsize,
}

impl MemoryContentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with the built-in document providers registered and no rows
    pub fn with_default_document_providers() -> Self {
        Self::new()
            .with_document_authority(EXTERNAL_STORAGE_AUTHORITY)
            .with_document_authority(DOWNLOADS_AUTHORITY)
            .with_document_authority(MEDIA_AUTHORITY)
    }

    pub fn from_fixture_data(fixture: Fixture) -> Self {
        Self {
            document_authorities: fixture.document_authorities.into_iter().collect(),
            rows: fixture.rows,
            ..Self::default()
        }
    }

    /// Load a TOML (or any format the `config` crate detects) fixture file
    pub fn from_fixture(path: &Path) -> Result<Self, ConfigError> {
        let fixture: Fixture = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        debug!(
            "Loaded fixture {} ({} rows, {} document authorities)",
            path.display(),
            fixture.rows.len(),
            fixture.document_authorities.len()
        );

        Ok(Self::from_fixture_data(fixture))
    }

    /// Registers `authority` as a structured-document provider
    pub fn with_document_authority(mut self, authority: &str) -> Self {
        self.document_authorities.insert(authority.to_string());
        self
    }

    /// Adds a row to `collection`, optionally addressable by `_id`
    pub fn with_row(mut self, collection: &str, id: Option<&str>, columns: &[(&str, &str)]) -> Self {
        self.rows.push(FixtureRow {
            collection: collection.to_string(),
            id: id.map(str::to_string),
            columns: columns
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self
    }

    /// Makes every query fail with a backend error
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Number of queries answered so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of cursors handed out and not yet dropped
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

impl ContentQueryService for MemoryContentService {
    fn query(
        &self,
        request: &QueryRequest<'_>,
    ) -> Result<Option<Box<dyn Cursor + '_>>, QueryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(QueryError::Backend(message.clone()));
        }

        if !request.collection.as_str().starts_with(CONTENT_PREFIX) {
            return Err(QueryError::UnknownCollection(request.collection.to_string()));
        }

        let mut rows = Vec::new();
        for row in &self.rows {
            if row.matches(request)? {
                rows.push(row);
            }
        }

        debug!(
            "Query {} selection={:?} -> {} rows",
            request.collection,
            request.selection,
            rows.len()
        );

        let cursor: Box<dyn Cursor + '_> =
            Box::new(MemoryCursor::open(rows, request.projection, &self.open_cursors));
        Ok(Some(cursor))
    }

    fn is_structured_document(&self, identifier: &ResourceIdentifier) -> bool {
        identifier
            .authority()
            .is_some_and(|a| self.document_authorities.contains(a))
            && document_id_from_path(identifier).is_some()
    }
}

struct MemoryCursor<'a> {
    rows: Vec<&'a FixtureRow>,
    projection: Vec<String>,
    position: Option<usize>,
    open: &'a AtomicUsize,
}

impl<'a> MemoryCursor<'a> {
    fn open(rows: Vec<&'a FixtureRow>, projection: &[&str], open: &'a AtomicUsize) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self {
            rows,
            projection: projection.iter().map(|c| c.to_string()).collect(),
            position: None,
            open,
        }
    }
}

impl Cursor for MemoryCursor<'_> {
    fn move_to_first(&mut self) -> bool {
        self.position = (!self.rows.is_empty()).then_some(0);
        self.position.is_some()
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        let index = self.projection.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .any(|row| row.columns.contains_key(column))
            .then_some(index)
    }

    fn get_string(&self, index: usize) -> Result<Option<String>, QueryError> {
        let position = self
            .position
            .ok_or_else(|| QueryError::Backend("cursor is not positioned on a row".into()))?;
        let column = self
            .projection
            .get(index)
            .ok_or_else(|| QueryError::MissingColumn(format!("index {}", index)))?;

        Ok(self.rows[position].columns.get(column).cloned())
    }
}

impl Drop for MemoryCursor<'_> {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DATA_COLUMN;
    use crate::uri::ContentUri;
    use std::io::Write;

    const IMAGES: &str = "content://media/external/images/media";

    fn service() -> MemoryContentService {
        MemoryContentService::with_default_document_providers()
            .with_row(IMAGES, Some("42"), &[(DATA_COLUMN, "/sdcard/DCIM/a.jpg")])
            .with_row(IMAGES, Some("43"), &[("title", "no data column")])
    }

    #[test]
    fn test_query_row_by_id_selection() {
        let service = service();
        let row = service
            .query_row(
                &ContentUri::new(IMAGES),
                &[DATA_COLUMN],
                Some(ID_SELECTION),
                &["42".to_string()],
            )
            .unwrap()
            .unwrap();

        assert_eq!(row.get(DATA_COLUMN), Some("/sdcard/DCIM/a.jpg"));
        assert_eq!(service.query_count(), 1);
        assert_eq!(service.open_cursors(), 0);
    }

    #[test]
    fn test_query_row_by_appended_id() {
        let service = service();
        let row = service
            .query_row(
                &ContentUri::new(IMAGES).with_appended_id(42),
                &[DATA_COLUMN],
                None,
                &[],
            )
            .unwrap()
            .unwrap();

        assert_eq!(row.get(DATA_COLUMN), Some("/sdcard/DCIM/a.jpg"));
    }

    #[test]
    fn test_query_row_without_match_is_none() {
        let service = service();
        let row = service
            .query_row(
                &ContentUri::new(IMAGES),
                &[DATA_COLUMN],
                Some("_id = ?"),
                &["999".to_string()],
            )
            .unwrap();

        assert_eq!(row, None);
        assert_eq!(service.open_cursors(), 0);
    }

    #[test]
    fn test_absent_column_is_left_out_of_row() {
        let service = service();
        let row = service
            .query_row(
                &ContentUri::new(IMAGES),
                &[DATA_COLUMN],
                Some(ID_SELECTION),
                &["43".to_string()],
            )
            .unwrap()
            .unwrap();

        assert!(!row.contains_column(DATA_COLUMN));
        assert_eq!(row.get(DATA_COLUMN), None);
    }

    #[test]
    fn test_unsupported_selection_and_failures() {
        let service = service();
        let err = service
            .query_row(&ContentUri::new(IMAGES), &[DATA_COLUMN], Some("title LIKE ?"), &[])
            .unwrap_err();
        assert_eq!(err, QueryError::UnsupportedSelection("title LIKE ?".into()));

        let failing = MemoryContentService::new().failing("provider crashed");
        let err = failing
            .query_row(&ContentUri::new(IMAGES), &[DATA_COLUMN], None, &[])
            .unwrap_err();
        assert_eq!(err, QueryError::Backend("provider crashed".into()));
        assert_eq!(failing.open_cursors(), 0);
    }

    #[test]
    fn test_non_content_collection_is_unknown() {
        let service = service();
        let err = service
            .query_row(&ContentUri::new("/not/a/collection"), &[DATA_COLUMN], None, &[])
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownCollection(_)));
    }

    #[test]
    fn test_is_structured_document() {
        let service = service();
        let doc = ResourceIdentifier::parse(
            "content://com.android.providers.media.documents/document/image%3A42",
        )
        .unwrap();
        let plain = ResourceIdentifier::parse("content://media/external/images/media/42").unwrap();
        let unregistered =
            ResourceIdentifier::parse("content://com.example.documents/document/x").unwrap();

        assert!(service.is_structured_document(&doc));
        assert!(!service.is_structured_document(&plain));
        assert!(!service.is_structured_document(&unregistered));
    }

    #[test]
    fn test_from_fixture_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
document_authorities = ["com.android.providers.downloads.documents"]

[[rows]]
collection = "content://downloads/public_downloads"
id = "7"
columns = {{ _data = "/sdcard/Download/seven.pdf" }}
"#
        )
        .unwrap();
        file.flush().unwrap();

        let service = MemoryContentService::from_fixture(file.path()).unwrap();
        let row = service
            .query_row(
                &ContentUri::new("content://downloads/public_downloads/7"),
                &[DATA_COLUMN],
                None,
                &[],
            )
            .unwrap()
            .unwrap();

        assert_eq!(row.get(DATA_COLUMN), Some("/sdcard/Download/seven.pdf"));
    }
}
