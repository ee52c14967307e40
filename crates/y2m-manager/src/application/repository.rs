//! The storage seam used by [`super::config_store::ConfigStore`].
//!
//! The store never touches the file system itself.  It asks a
//! [`ConfigRepository`] for text and settings, so the same bookkeeping code
//! runs against real files in production and against in-memory doubles in
//! tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use y2m_core::AppSettings;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`AppSettings`].
    #[error("failed to parse settings JSON: {0}")]
    SettingsParse(#[source] serde_json::Error),

    /// The settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    SettingsSerialize(#[source] serde_json::Error),
}

impl StorageError {
    /// Returns `true` if the error is an I/O "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Persistence operations needed by the configuration store.
///
/// Infrastructure implementations use the file system; test implementations
/// keep everything in memory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Reads the persisted application settings.
    async fn load_settings(&self) -> Result<AppSettings, StorageError>;

    /// Persists the application settings.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;

    /// Reads the configuration file at `path` as text.
    async fn read_config(&self, path: &Path) -> Result<String, StorageError>;

    /// Reads the bootstrap configuration used when the configured file is
    /// unreadable.
    async fn read_bootstrap(&self) -> Result<String, StorageError>;

    /// Writes `text` to `path`, creating missing parent directories and
    /// replacing any previous content.
    async fn write_config(&self, path: &Path, text: &str) -> Result<(), StorageError>;
}
