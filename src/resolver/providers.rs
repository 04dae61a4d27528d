//! Provider rules
//!
//! Maps a document provider's authority to the rule that turns one of its
//! document ids into a candidate path. Authorities are matched exactly.

use log::debug;
use std::collections::HashMap;

use super::data_column::query_data_column;
use crate::config::{
    DOWNLOADS_AUTHORITY, EXTERNAL_STORAGE_AUTHORITY, MEDIA_AUTHORITY, ResolverConfig,
};
use crate::error::ResolveError;
use crate::query::{ContentQueryService, ID_SELECTION};
use crate::uri::{ContentUri, DocumentId, ResourceIdentifier};

const PRIMARY_VOLUME: &str = "primary";
const RAW_PREFIX: &str = "raw:";

/// What a provider rule gets to work with
pub struct ProviderContext<'a> {
    pub config: &'a ResolverConfig,
    pub service: &'a dyn ContentQueryService,
    pub identifier: &'a ResourceIdentifier,
}

/// A provider rule: `Ok(None)` when the provider has no path for the document
pub type ProviderHandler =
    fn(&ProviderContext<'_>, &DocumentId) -> Result<Option<String>, ResolveError>;

/// Authority to rule dispatch table
#[derive(Clone)]
pub struct ProviderTable {
    handlers: HashMap<String, ProviderHandler>,
}

impl Default for ProviderTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProviderTable {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// External storage, downloads and media providers
    pub fn builtin() -> Self {
        Self::empty()
            .with_provider(EXTERNAL_STORAGE_AUTHORITY, external_storage)
            .with_provider(DOWNLOADS_AUTHORITY, downloads)
            .with_provider(MEDIA_AUTHORITY, media)
    }

    /// Registers (or replaces) the rule for `authority`
    pub fn with_provider(mut self, authority: &str, handler: ProviderHandler) -> Self {
        self.handlers.insert(authority.to_string(), handler);
        self
    }

    pub fn handler(&self, authority: &str) -> Option<ProviderHandler> {
        self.handlers.get(authority).copied()
    }
}

fn join(root: &str, relative: &str) -> String {
    if root == "/" {
        format!("/{}", relative)
    } else {
        format!("{}/{}", root, relative)
    }
}

/// True when `relative` would climb out of the directory it is joined onto
fn leaves_root(relative: &str) -> bool {
    relative.split('/').any(|component| component == "..")
}

/// `primary:<rel>` maps under the external-storage root; any other kind is
/// taken as a secondary volume name under the secondary-volume root.
///
/// The secondary-volume path is a guess: volume names are not checked against
/// the mount table, so it only resolves when that directory happens to exist.
/// Volume names must be a single path component, and `..` components in the
/// relative part are rejected, so candidates stay under their root.
fn external_storage(
    ctx: &ProviderContext<'_>,
    doc: &DocumentId,
) -> Result<Option<String>, ResolveError> {
    let kind = doc.kind();
    let local_ref = doc.local_ref();

    if kind.is_empty() {
        return Err(ResolveError::MalformedIdentifier(format!(
            "storage document id without a volume: {}",
            doc.raw()
        )));
    }

    if kind == "." || kind.contains('/') || leaves_root(kind) || leaves_root(local_ref) {
        return Err(ResolveError::MalformedIdentifier(format!(
            "storage document id escapes its volume: {}",
            doc.raw()
        )));
    }

    if kind.eq_ignore_ascii_case(PRIMARY_VOLUME) {
        let root = ctx.config.external_storage_root_trimmed();
        if local_ref.is_empty() {
            return Ok(Some(root.to_string()));
        }
        return Ok(Some(join(root, local_ref)));
    }

    let volume = join(ctx.config.secondary_volume_root_trimmed(), kind);
    debug!("Guessing secondary volume {} for {}", volume, ctx.identifier.raw());

    if local_ref.is_empty() {
        Ok(Some(volume))
    } else {
        Ok(Some(join(&volume, local_ref)))
    }
}

/// Numeric ids are row ids in the downloads collection; `raw:<path>` ids carry
/// the path itself and need no query.
fn downloads(ctx: &ProviderContext<'_>, doc: &DocumentId) -> Result<Option<String>, ResolveError> {
    let raw = doc.raw();

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        let id: u64 = raw.parse().map_err(|_| {
            ResolveError::MalformedIdentifier(format!("download id out of range: {}", raw))
        })?;
        let row_ref = ContentUri::new(ctx.config.downloads_collection.as_str()).with_appended_id(id);
        return query_data_column(ctx.service, &row_ref, None, &[]);
    }

    match raw.strip_prefix(RAW_PREFIX) {
        Some(path) if !path.is_empty() => Ok(Some(path.to_string())),
        _ => Err(ResolveError::MalformedIdentifier(format!(
            "download id is neither numeric nor raw: {}",
            raw
        ))),
    }
}

/// `image:<id>`, `video:<id>` and `audio:<id>` select a row by `_id` in the
/// matching media collection.
fn media(ctx: &ProviderContext<'_>, doc: &DocumentId) -> Result<Option<String>, ResolveError> {
    let collection = match doc.kind() {
        "image" => &ctx.config.images_collection,
        "video" => &ctx.config.video_collection,
        "audio" => &ctx.config.audio_collection,
        other => {
            return Err(ResolveError::MalformedIdentifier(format!(
                "unknown media kind: {}",
                other
            )));
        }
    };

    if doc.local_ref().is_empty() {
        return Err(ResolveError::MalformedIdentifier(format!(
            "media document id without a row id: {}",
            doc.raw()
        )));
    }

    query_data_column(
        ctx.service,
        &ContentUri::new(collection.as_str()),
        Some(ID_SELECTION),
        &[doc.local_ref().to_string()],
    )
}
