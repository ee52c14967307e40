//! Application settings: where the configuration aggregate lives on disk.
//!
//! Stored as a small JSON document next to the process:
//!
//! ```json
//! {
//!   "devicesFilePath": "/opt/yandex2mqtt/config.js"
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Location used when no settings file exists yet.
pub const DEFAULT_DEVICES_FILE_PATH: &str = "/opt/yandex2mqtt/config.js";

/// Persisted application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Absolute path of the `module.exports` configuration file.
    #[serde(default = "default_devices_file_path")]
    pub devices_file_path: String,
}

/// Partial update of [`AppSettings`]; `None` or an empty path leaves a field
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppSettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices_file_path: Option<String>,
}

fn default_devices_file_path() -> String {
    DEFAULT_DEVICES_FILE_PATH.to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            devices_file_path: default_devices_file_path(),
        }
    }
}

impl AppSettings {
    /// Applies `update` in place.
    pub fn apply(&mut self, update: AppSettingsUpdate) {
        if let Some(path) = update.new_devices_file_path() {
            self.devices_file_path = path.to_string();
        }
    }
}

impl AppSettingsUpdate {
    /// The requested configuration path, if the update actually names one.
    pub fn new_devices_file_path(&self) -> Option<&str> {
        self.devices_file_path.as_deref().filter(|path| !path.is_empty())
    }
}
