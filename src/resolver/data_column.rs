//! Data-column lookup shared by the provider rules

use log::debug;

use crate::error::ResolveError;
use crate::query::{ContentQueryService, DATA_COLUMN};
use crate::uri::ContentUri;

/// Reads the `_data` column of the first row matching the selection.
///
/// No row, an absent column, a null value and an empty value all mean
/// "no path" and give `Ok(None)`. Only service failures are errors.
pub fn query_data_column(
    service: &dyn ContentQueryService,
    collection: &ContentUri,
    selection: Option<&str>,
    selection_args: &[String],
) -> Result<Option<String>, ResolveError> {
    let Some(row) = service.query_row(collection, &[DATA_COLUMN], selection, selection_args)?
    else {
        debug!("No row in {} for {:?}", collection, selection_args);
        return Ok(None);
    };

    if !row.contains_column(DATA_COLUMN) {
        debug!("{} has no {} column", collection, DATA_COLUMN);
        return Ok(None);
    }

    Ok(row
        .get(DATA_COLUMN)
        .filter(|path| !path.is_empty())
        .map(str::to_string))
}
