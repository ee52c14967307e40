//! File-system implementation of [`ConfigRepository`].
//!
//! Two files live under a base directory (the process working directory by
//! default):
//!
//! - `app-settings.json` – the [`AppSettings`] record, pretty-printed JSON;
//! - `attached_assets/config.bootstrap.js` – a read-only fallback
//!   configuration used when the configured file cannot be read.
//!
//! The configuration file itself lives wherever the settings point, usually
//! `/opt/yandex2mqtt/config.js`.
//!
//! # What is serde_json pretty printing? (for beginners)
//!
//! `serde_json::to_string_pretty` emits the same JSON as `to_string` but with
//! newlines and two-space indentation, so the settings file stays readable and
//! diffs cleanly:
//!
//! ```json
//! {
//!   "devicesFilePath": "/opt/yandex2mqtt/config.js"
//! }
//! ```
//!
//! # Async file I/O
//!
//! All reads and writes go through `tokio::fs`, which runs the blocking system
//! calls on tokio's blocking thread pool so the async executor is never stalled
//! by a slow disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use y2m_core::AppSettings;

use crate::application::repository::{ConfigRepository, StorageError};

/// Name of the settings file inside the base directory.
pub const SETTINGS_FILE_NAME: &str = "app-settings.json";

/// Bootstrap configuration, relative to the base directory.
pub const BOOTSTRAP_FILE_NAME: &str = "attached_assets/config.bootstrap.js";

/// Locations of the files owned by the store itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub settings_file: PathBuf,
    pub bootstrap_file: PathBuf,
}

impl StorePaths {
    /// Resolves both files relative to `base`.
    pub fn in_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            settings_file: base.join(SETTINGS_FILE_NAME),
            bootstrap_file: base.join(BOOTSTRAP_FILE_NAME),
        }
    }
}

/// [`ConfigRepository`] backed by real files.
#[derive(Debug, Clone)]
pub struct FileRepository {
    paths: StorePaths,
}

impl FileRepository {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }
}

async fn read_text(path: &Path) -> Result<String, StorageError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes `text` to `path`, creating missing parent directories first.
async fn write_text(path: &Path, text: &str) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, text)
        .await
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[async_trait]
impl ConfigRepository for FileRepository {
    async fn load_settings(&self) -> Result<AppSettings, StorageError> {
        let text = read_text(&self.paths.settings_file).await?;
        serde_json::from_str(&text).map_err(StorageError::SettingsParse)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(settings).map_err(StorageError::SettingsSerialize)?;
        write_text(&self.paths.settings_file, &text).await?;
        debug!("wrote {}", self.paths.settings_file.display());
        Ok(())
    }

    async fn read_config(&self, path: &Path) -> Result<String, StorageError> {
        read_text(path).await
    }

    async fn read_bootstrap(&self) -> Result<String, StorageError> {
        read_text(&self.paths.bootstrap_file).await
    }

    async fn write_config(&self, path: &Path, text: &str) -> Result<(), StorageError> {
        write_text(path, text).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
