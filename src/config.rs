//! Configuration management for the URI path resolver
//!
//! Holds the platform constants the provider rules build paths and row
//! references from. Defaults match a stock device; every value can be
//! overridden from `config.toml` or `URI_RESOLVER_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Authority of the external-storage documents provider
pub const EXTERNAL_STORAGE_AUTHORITY: &str = "com.android.externalstorage.documents";

/// Authority of the downloads documents provider
pub const DOWNLOADS_AUTHORITY: &str = "com.android.providers.downloads.documents";

/// Authority of the media documents provider
pub const MEDIA_AUTHORITY: &str = "com.android.providers.media.documents";

/// Cloud providers whose items never have a local path
pub const DEFAULT_CLOUD_ONLY_AUTHORITIES: [&str; 3] = [
    "com.google.android.apps.docs.storage",
    "com.google.android.apps.docs.storage.legacy",
    "com.google.android.apps.photos.content",
];

/// Resolver configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Mount point of the primary shared-storage volume
    pub external_storage_root: String,

    /// Directory secondary volumes are conventionally mounted under
    pub secondary_volume_root: String,

    /// Row collection numeric download ids are appended to
    pub downloads_collection: String,

    pub images_collection: String,
    pub video_collection: String,
    pub audio_collection: String,

    /// Authorities resolved to `Unresolved` without querying
    pub cloud_only_authorities: Vec<String>,

    /// Upper bound a caller puts around one resolution, in milliseconds
    pub query_timeout_ms: u64,

    /// Row fixture for the in-memory content service (probe binary only)
    #[serde(default)]
    pub fixture_path: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            external_storage_root: "/storage/emulated/0".to_string(),
            secondary_volume_root: "/storage".to_string(),
            downloads_collection: "content://downloads/public_downloads".to_string(),
            images_collection: "content://media/external/images/media".to_string(),
            video_collection: "content://media/external/video/media".to_string(),
            audio_collection: "content://media/external/audio/media".to_string(),
            cloud_only_authorities: DEFAULT_CLOUD_ONLY_AUTHORITIES
                .iter()
                .map(|a| a.to_string())
                .collect(),
            query_timeout_ms: 2000,
            fixture_path: None,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_environment(Self::environment())
    }

    /// `URI_RESOLVER_*` variables; `cloud_only_authorities` is comma-separated
    fn environment() -> Environment {
        Environment::with_prefix("URI_RESOLVER")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("cloud_only_authorities")
    }

    fn load_with_environment(environment: Environment) -> Result<Self, ConfigError> {
        // Packaged layout first, then the working directory
        let config_paths = ["uri-resolver/config", "config"];

        let mut builder = Self::defaults_builder()?;
        for config_path in &config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder.add_source(environment).build()?;

        let config: ResolverConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from one explicit file, on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings = Self::defaults_builder()?
            .add_source(File::from(path))
            .build()?;

        let config: ResolverConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        let defaults = ResolverConfig::default();
        Config::builder()
            .set_default("external_storage_root", defaults.external_storage_root)?
            .set_default("secondary_volume_root", defaults.secondary_volume_root)?
            .set_default("downloads_collection", defaults.downloads_collection)?
            .set_default("images_collection", defaults.images_collection)?
            .set_default("video_collection", defaults.video_collection)?
            .set_default("audio_collection", defaults.audio_collection)?
            .set_default("cloud_only_authorities", defaults.cloud_only_authorities)?
            .set_default("query_timeout_ms", defaults.query_timeout_ms as i64)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, root) in [
            ("external_storage_root", &self.external_storage_root),
            ("secondary_volume_root", &self.secondary_volume_root),
        ] {
            if root.is_empty() {
                return Err(ConfigError::Message(format!("{key} cannot be empty")));
            }
            if !root.starts_with('/') {
                return Err(ConfigError::Message(format!(
                    "{key} must be an absolute path, got {root}"
                )));
            }
        }

        for (key, collection) in [
            ("downloads_collection", &self.downloads_collection),
            ("images_collection", &self.images_collection),
            ("video_collection", &self.video_collection),
            ("audio_collection", &self.audio_collection),
        ] {
            if collection.trim().is_empty() {
                return Err(ConfigError::Message(format!("{key} cannot be empty")));
            }
        }

        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "query_timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get the resolution timeout as Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Whether `authority` is a cloud-only provider
    pub fn is_cloud_only(&self, authority: &str) -> bool {
        self.cloud_only_authorities.iter().any(|a| a == authority)
    }

    /// Root with any trailing separators removed, "/" stays "/"
    pub fn external_storage_root_trimmed(&self) -> &str {
        trim_root(&self.external_storage_root)
    }

    pub fn secondary_volume_root_trimmed(&self) -> &str {
        trim_root(&self.secondary_volume_root)
    }
}

fn trim_root(root: &str) -> &str {
    let trimmed = root.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
