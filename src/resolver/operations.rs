//! Resolve operations implementation

use log::debug;
use std::path::Path;

use super::data_column::query_data_column;
use super::providers::{ProviderContext, ProviderHandler, ProviderTable};
use super::results::ResolutionResult;
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::error::handlers::handle_error;
use crate::query::ContentQueryService;
use crate::storage::{LocalFilesystem, PathProbe};
use crate::uri::{ContentUri, DocumentId, ResourceIdentifier};

/// Resolves resource identifiers to existing local paths.
///
/// Holds no per-call state, so one resolver can serve concurrent callers as
/// long as the probe can.
#[derive(Clone)]
pub struct PathResolver<P = LocalFilesystem> {
    config: ResolverConfig,
    providers: ProviderTable,
    probe: P,
}

impl Default for PathResolver<LocalFilesystem> {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl PathResolver<LocalFilesystem> {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_probe(config, LocalFilesystem)
    }
}

impl<P: PathProbe> PathResolver<P> {
    /// Resolver using `probe` for the final existence check
    pub fn with_probe(config: ResolverConfig, probe: P) -> Self {
        Self {
            config,
            providers: ProviderTable::builtin(),
            probe,
        }
    }

    /// Adds a document provider rule on top of the built-in ones
    pub fn with_provider(mut self, authority: &str, handler: ProviderHandler) -> Self {
        self.providers = self.providers.with_provider(authority, handler);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `identifier`, never failing.
    ///
    /// Every error is logged and turned into `Unresolved(identifier)`.
    pub fn resolve(&self, identifier: &str, service: &dyn ContentQueryService) -> ResolutionResult {
        match self.try_resolve(identifier, service) {
            Ok(path) => {
                debug!("Resolved {} -> {}", identifier, path);
                ResolutionResult::Resolved(path)
            }
            Err(err) => {
                handle_error(identifier, &err);
                ResolutionResult::Unresolved(identifier.to_string())
            }
        }
    }

    /// Resolves `identifier`, reporting why resolution failed.
    ///
    /// Order: `file` scheme, cloud-only authority, structured document,
    /// generic content link. Candidates from the last two must exist on disk.
    pub fn try_resolve(
        &self,
        identifier: &str,
        service: &dyn ContentQueryService,
    ) -> Result<String, ResolveError> {
        let parsed = ResourceIdentifier::parse(identifier)?;

        if parsed.is_file() {
            return Ok(parsed.path().to_string());
        }

        if let Some(authority) = parsed.authority() {
            if self.config.is_cloud_only(authority) {
                return Err(ResolveError::UnsupportedProvider(authority.to_string()));
            }
        }

        let candidate = if service.is_structured_document(&parsed) {
            self.resolve_document(&parsed, service)?
        } else if parsed.is_content() {
            let collection = ContentUri::new(identifier.trim());
            query_data_column(service, &collection, None, &[])?
        } else {
            return Err(ResolveError::UnsupportedProvider(format!(
                "no rule for scheme {}",
                parsed.scheme()
            )));
        };

        let candidate = candidate.ok_or_else(|| {
            ResolveError::QueryFailure(format!("no _data value for {}", identifier))
        })?;

        self.verify_exists(candidate)
    }

    fn resolve_document(
        &self,
        parsed: &ResourceIdentifier,
        service: &dyn ContentQueryService,
    ) -> Result<Option<String>, ResolveError> {
        let authority = service.authority(parsed).ok_or_else(|| {
            ResolveError::MalformedIdentifier(format!("document without authority: {}", parsed.raw()))
        })?;

        if self.config.is_cloud_only(&authority) {
            return Err(ResolveError::UnsupportedProvider(authority));
        }

        let doc_id = service.document_id(parsed).ok_or_else(|| {
            ResolveError::MalformedIdentifier(format!("document without id: {}", parsed.raw()))
        })?;

        let handler = self
            .providers
            .handler(&authority)
            .ok_or_else(|| ResolveError::UnsupportedProvider(authority.clone()))?;

        let ctx = ProviderContext {
            config: &self.config,
            service,
            identifier: parsed,
        };

        debug!("Dispatching document {} to provider {}", doc_id, authority);
        handler(&ctx, &DocumentId::parse(&doc_id))
    }

    fn verify_exists(&self, candidate: String) -> Result<String, ResolveError> {
        match self.probe.exists(Path::new(&candidate)) {
            Ok(true) => Ok(candidate),
            Ok(false) => Err(ResolveError::PathNotFound(candidate)),
            Err(e) => Err(ResolveError::PathNotFound(format!("{}: {}", candidate, e))),
        }
    }
}

/// Resolves with the default configuration against the local filesystem
pub fn resolve(identifier: &str, service: &dyn ContentQueryService) -> ResolutionResult {
    PathResolver::<LocalFilesystem>::default().resolve(identifier, service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{DATA_COLUMN, MemoryContentService};
    use std::collections::HashSet;
    use std::io;

    /// Probe that only knows a fixed set of paths
    struct KnownPaths(HashSet<String>);

    impl KnownPaths {
        fn of(paths: &[&str]) -> Self {
            Self(paths.iter().map(|p| p.to_string()).collect())
        }
    }

    impl PathProbe for KnownPaths {
        fn exists(&self, path: &Path) -> io::Result<bool> {
            Ok(self.0.contains(path.to_string_lossy().as_ref()))
        }
    }

    struct BrokenProbe;

    impl PathProbe for BrokenProbe {
        fn exists(&self, _path: &Path) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn resolver(paths: &[&str]) -> PathResolver<KnownPaths> {
        PathResolver::with_probe(ResolverConfig::default(), KnownPaths::of(paths))
    }

    #[test]
    fn test_file_scheme_skips_service_and_probe() {
        let service = MemoryContentService::new();
        let resolver = resolver(&[]);

        let result = resolver.resolve("file:///storage/emulated/0/notes.txt", &service);
        assert_eq!(
            result,
            ResolutionResult::Resolved("/storage/emulated/0/notes.txt".into())
        );
        assert_eq!(service.query_count(), 0);
    }

    #[test]
    fn test_primary_storage_document() {
        let service = MemoryContentService::with_default_document_providers();
        let resolver = resolver(&["/storage/emulated/0/Download/x.txt"]);

        let result = resolver.resolve(
            "content://com.android.externalstorage.documents/document/primary%3ADownload%2Fx.txt",
            &service,
        );
        assert_eq!(
            result,
            ResolutionResult::Resolved("/storage/emulated/0/Download/x.txt".into())
        );
        assert_eq!(service.query_count(), 0);
    }

    #[test]
    fn test_missing_candidate_is_unresolved() {
        let service = MemoryContentService::with_default_document_providers();
        let resolver = resolver(&[]);
        let identifier =
            "content://com.android.externalstorage.documents/document/primary%3AGone.txt";

        assert_eq!(
            resolver.try_resolve(identifier, &service),
            Err(ResolveError::PathNotFound("/storage/emulated/0/Gone.txt".into()))
        );
        assert_eq!(
            resolver.resolve(identifier, &service),
            ResolutionResult::Unresolved(identifier.into())
        );
    }

    #[test]
    fn test_probe_error_is_path_not_found() {
        let service = MemoryContentService::with_default_document_providers();
        let resolver = PathResolver::with_probe(ResolverConfig::default(), BrokenProbe);
        let identifier = "content://com.android.externalstorage.documents/document/primary%3Aa.txt";

        assert!(matches!(
            resolver.try_resolve(identifier, &service),
            Err(ResolveError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_cloud_only_authority_issues_no_query() {
        let service = MemoryContentService::new()
            .with_document_authority("com.google.android.apps.docs.storage");
        let resolver = resolver(&[]);

        for identifier in [
            "content://com.google.android.apps.docs.storage/document/acc%3D1%3Bdoc%3D2",
            "content://com.google.android.apps.photos.content/-1/1/content%3A%2F%2Fmedia/ORIGINAL/NONE/1",
        ] {
            assert!(matches!(
                resolver.try_resolve(identifier, &service),
                Err(ResolveError::UnsupportedProvider(_))
            ));
        }
        assert_eq!(service.query_count(), 0);
    }

    #[test]
    fn test_unregistered_document_provider_is_unsupported() {
        let service =
            MemoryContentService::new().with_document_authority("com.example.documents");
        let resolver = resolver(&[]);

        assert_eq!(
            resolver.try_resolve("content://com.example.documents/document/7", &service),
            Err(ResolveError::UnsupportedProvider("com.example.documents".into()))
        );
        assert_eq!(service.query_count(), 0);
    }

    #[test]
    fn test_custom_provider_rule() {
        fn fixed(
            _ctx: &ProviderContext<'_>,
            doc: &DocumentId,
        ) -> Result<Option<String>, ResolveError> {
            Ok(Some(format!("/data/shared/{}", doc.local_ref())))
        }

        let service =
            MemoryContentService::new().with_document_authority("com.example.documents");
        let resolver = resolver(&["/data/shared/a.txt"]).with_provider("com.example.documents", fixed);

        assert_eq!(
            resolver.resolve("content://com.example.documents/document/file%3Aa.txt", &service),
            ResolutionResult::Resolved("/data/shared/a.txt".into())
        );
    }

    #[test]
    fn test_generic_content_link() {
        let identifier = "content://media/external/file/99";
        let service = MemoryContentService::new().with_row(
            identifier,
            None,
            &[(DATA_COLUMN, "/storage/emulated/0/DCIM/99.jpg")],
        );
        let resolver = resolver(&["/storage/emulated/0/DCIM/99.jpg"]);

        assert_eq!(
            resolver.resolve(identifier, &service),
            ResolutionResult::Resolved("/storage/emulated/0/DCIM/99.jpg".into())
        );
        assert_eq!(service.query_count(), 1);
        assert_eq!(service.open_cursors(), 0);
    }

    #[test]
    fn test_generic_content_without_row_is_query_failure() {
        let service = MemoryContentService::new();
        let resolver = resolver(&[]);

        assert!(matches!(
            resolver.try_resolve("content://com.example.provider/items/1", &service),
            Err(ResolveError::QueryFailure(_))
        ));
        assert_eq!(service.query_count(), 1);
    }

    #[test]
    fn test_service_failure_is_unresolved() {
        let service = MemoryContentService::with_default_document_providers().failing("boom");
        let resolver = resolver(&[]);
        let identifier = "content://com.android.providers.downloads.documents/document/42";

        assert_eq!(
            resolver.try_resolve(identifier, &service),
            Err(ResolveError::QueryFailure("Query backend error: boom".into()))
        );
        assert_eq!(
            resolver.resolve(identifier, &service),
            ResolutionResult::Unresolved(identifier.into())
        );
        assert_eq!(service.open_cursors(), 0);
    }

    #[test]
    fn test_other_schemes_are_unresolved() {
        let service = MemoryContentService::new();
        let resolver = resolver(&[]);

        for identifier in ["https://example.com/a.pdf", "mailto:someone@example.com"] {
            assert_eq!(
                resolver.resolve(identifier, &service),
                ResolutionResult::Unresolved(identifier.into())
            );
        }
        assert_eq!(service.query_count(), 0);
    }
}
