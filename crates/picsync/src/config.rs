//! Layered configuration for the picsync binary.
//!
//! Sources, lowest precedence first:
//! 1. Bundled defaults (`picsync.toml` compiled into the binary)
//! 2. `~/.config/picsync/picsync.toml`
//! 3. `./picsync.toml`
//! 4. `PICSYNC_<SECTION>__<KEY>` environment variables

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use picsync_error::{ConfigError, ConfigErrorKind, PicsyncError, PicsyncResult};
use picsync_hosting::{CloudinaryHost, HostProvider, ImageHost, ImgurHost};
use picsync_storage::{DOCUMENT_CAPACITY_BYTES, METADATA_HEADROOM_BYTES, StoreLimits};
use picsync_sync::SizePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../picsync.toml");

/// Directory name used under the platform data and config directories.
const APP_DIR: &str = "picsync";

/// Where records are kept and how large a document may be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store directory; the platform data directory when unset
    pub path: Option<PathBuf>,
    /// Hard cap of one stored document, in bytes
    pub document_capacity: usize,
    /// Bytes of each document reserved for metadata
    pub metadata_headroom: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            document_capacity: DOCUMENT_CAPACITY_BYTES,
            metadata_headroom: METADATA_HEADROOM_BYTES,
        }
    }
}

impl StoreConfig {
    /// Resolved store directory.
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from(".picsync")),
        }
    }
}

/// Policy tier selected in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Chunk payloads above the inline cap
    #[default]
    Chunked,
    /// Reject payloads above the inline cap
    InlineOnly,
}

/// How payload sizes are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Policy tier
    pub mode: PolicyMode,
    /// Absolute payload limit in bytes
    pub max_payload_bytes: Option<usize>,
}

/// Image host credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostingConfig {
    /// Host used by `picsync upload`
    pub provider: HostProvider,
    /// Imgur application client ID
    pub imgur_client_id: Option<String>,
    /// Cloudinary cloud name
    pub cloudinary_cloud_name: Option<String>,
    /// Cloudinary unsigned upload preset
    pub cloudinary_upload_preset: Option<String>,
}

impl HostingConfig {
    /// Build a client for the configured provider.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if the provider's credentials are unset.
    pub fn build_host(&self) -> PicsyncResult<Box<dyn ImageHost>> {
        let host: Box<dyn ImageHost> = match self.provider {
            HostProvider::Imgur => Box::new(ImgurHost::new(
                self.imgur_client_id.clone().unwrap_or_default(),
            )?),
            HostProvider::Cloudinary => Box::new(CloudinaryHost::new(
                self.cloudinary_cloud_name.clone().unwrap_or_default(),
                self.cloudinary_upload_preset.clone().unwrap_or_default(),
            )?),
        };
        Ok(host)
    }
}

/// Complete picsync configuration.
///
/// # Example
///
/// ```toml
/// [store]
/// path = "/var/lib/picsync"
/// document_capacity = 1_048_487
/// metadata_headroom = 100
///
/// [policy]
/// mode = "inline_only"
///
/// [hosting]
/// provider = "cloudinary"
/// cloudinary_cloud_name = "demo"
/// cloudinary_upload_preset = "unsigned"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PicsyncConfig {
    /// Store location and limits
    pub store: StoreConfig,
    /// Size policy
    pub policy: PolicyConfig,
    /// Image host
    pub hosting: HostingConfig,
}

impl PicsyncConfig {
    /// Load configuration from every source, see the module docs.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a source is malformed.
    #[instrument]
    pub fn load() -> PicsyncResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        let mut builder = Self::bundled_builder();

        if let Some(config_dir) = dirs::home_dir() {
            let home_config = config_dir.join(".config").join(APP_DIR).join("picsync.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("picsync").required(false))
            .add_source(
                Environment::with_prefix("PICSYNC")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::finish(builder)
    }

    /// Bundled defaults only.
    pub fn bundled() -> PicsyncResult<Self> {
        Self::finish(Self::bundled_builder())
    }

    /// Load a single TOML file; unset keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file is missing or malformed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> PicsyncResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .build()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(ConfigErrorKind::Load {
                    source_name: path.as_ref().display().to_string(),
                    detail: e.to_string(),
                }))
            })?
            .try_deserialize()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string())))
            })
    }

    /// Per-document limits of the store.
    pub fn limits(&self) -> PicsyncResult<StoreLimits> {
        StoreLimits::new(self.store.document_capacity, self.store.metadata_headroom)
    }

    /// Size policy implied by the store limits and the policy section.
    pub fn size_policy(&self) -> PicsyncResult<SizePolicy> {
        let capacity = self.limits()?.max_field_bytes();
        Ok(match self.policy.mode {
            PolicyMode::Chunked => SizePolicy::Chunked {
                chunk_capacity: capacity,
                max_payload_bytes: self.policy.max_payload_bytes,
            },
            PolicyMode::InlineOnly => SizePolicy::InlineOnly {
                max_inline_bytes: self
                    .policy
                    .max_payload_bytes
                    .map_or(capacity, |max| max.min(capacity)),
            },
        })
    }

    /// Check the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns an error if the headroom leaves no room for data or the
    /// derived policy does not fit the store.
    pub fn validate(&self) -> PicsyncResult<()> {
        let limits = self.limits()?;
        self.size_policy()?.validate_for(&limits)
    }

    fn bundled_builder() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> PicsyncResult<Self> {
        builder
            .build()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(ConfigErrorKind::Load {
                    source_name: "layered sources".to_string(),
                    detail: e.to_string(),
                }))
            })?
            .try_deserialize()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string())))
            })
    }
}
