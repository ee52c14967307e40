//! ConfigStore: device CRUD on top of a yandex2mqtt configuration file.
//!
//! The store owns four pieces of state:
//!
//! - the [`DeviceRegistry`] – the live id → device map;
//! - the loaded [`Configuration`] minus its devices (mqtt, https, clients,
//!   users and any unknown keys);
//! - the path of the configuration file currently in use;
//! - the [`AppSettings`] record that says where that file lives.
//!
//! # Devices are a derived view
//!
//! The `devices` array of the configuration is never stored alongside the
//! registry.  It is materialized from the registry each time the
//! configuration is handed out or written, so the two can never disagree.
//!
//! # Error tiers
//!
//! | Operation                          | On failure                              |
//! |------------------------------------|-----------------------------------------|
//! | settings load / save               | logged, defaults kept                   |
//! | configuration load                 | logged, reset to [`Configuration::default`] |
//! | [`ConfigStore::save_configuration`]| returned as [`StoreError`]              |
//! | update / delete of an unknown id   | `None` / `false`                        |
//!
//! # Concurrency
//!
//! Mutating methods take `&mut self` and the store holds no locks.  Hosts that
//! share one store between tasks wrap it in a `tokio::sync::Mutex`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};
use y2m_core::{
    parse_configuration, render_configuration, AppSettings, AppSettingsUpdate, Configuration,
    Device, DeviceFields, ModuleExportsError,
};

use super::device_registry::DeviceRegistry;
use super::repository::{ConfigRepository, StorageError};

/// Error type for [`ConfigStore::save_configuration`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write configuration: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] ModuleExportsError),
}

/// Why a configuration load fell back to defaults.  Only ever logged.
#[derive(Debug, Error)]
enum LoadError {
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Parse(#[from] ModuleExportsError),
}

/// In-memory device registry synchronized with a configuration file.
pub struct ConfigStore {
    repository: Arc<dyn ConfigRepository>,
    registry: DeviceRegistry,
    /// Everything but the devices; `None` until the first load.
    configuration: Option<Configuration>,
    config_path: PathBuf,
    settings: AppSettings,
}

impl ConfigStore {
    /// Creates a store with default settings without touching storage.
    ///
    /// The configuration is loaded lazily by [`ConfigStore::get_configuration`].
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        let settings = AppSettings::default();
        Self {
            repository,
            registry: DeviceRegistry::new(),
            configuration: None,
            config_path: PathBuf::from(&settings.devices_file_path),
            settings,
        }
    }

    /// Creates a store and loads settings, then the configuration they point
    /// at.  Never fails: anything unreadable falls back to defaults.
    pub async fn open(repository: Arc<dyn ConfigRepository>) -> Self {
        let mut store = Self::new(repository);
        store.load_app_settings().await;
        store.load_configuration().await;
        store
    }

    // ── Settings persistence ──────────────────────────────────────────────────

    /// Loads the settings file and switches to the configuration path it names.
    ///
    /// Failures are logged and leave the current settings in place.
    pub async fn load_app_settings(&mut self) {
        match self.repository.load_settings().await {
            Ok(settings) => {
                self.config_path = PathBuf::from(&settings.devices_file_path);
                self.settings = settings;
                info!("app settings loaded; devices file is {}", self.config_path.display());
            }
            Err(e) if e.is_not_found() => info!("no app settings file; using default app settings"),
            Err(e) => warn!("failed to load app settings: {e}; using default app settings"),
        }
    }

    /// Persists the settings record.  Failures are logged, not returned.
    pub async fn save_app_settings(&self) {
        match self.repository.save_settings(&self.settings).await {
            Ok(()) => debug!("app settings saved"),
            Err(e) => error!("failed to save app settings: {e}"),
        }
    }

    // ── Configuration persistence ─────────────────────────────────────────────

    /// Loads the configuration file at the current path.
    ///
    /// Falls back to the bootstrap file when the configured one cannot be
    /// read.  On any failure the configuration is reset to
    /// [`Configuration::default`] and the registry is emptied.
    pub async fn load_configuration(&mut self) {
        match self.read_configuration().await {
            Ok(mut config) => {
                let devices = std::mem::take(&mut config.devices);
                self.registry.replace_all(devices);
                self.configuration = Some(config);
                info!(
                    "loaded {} devices from {}",
                    self.registry.len(),
                    self.config_path.display()
                );
            }
            Err(e) => {
                warn!(
                    "failed to load configuration from {}: {e}; using defaults",
                    self.config_path.display()
                );
                self.registry.clear();
                self.configuration = Some(Configuration::default());
            }
        }
    }

    async fn read_configuration(&self) -> Result<Configuration, LoadError> {
        let text = match self.repository.read_config(&self.config_path).await {
            Ok(text) => text,
            Err(e) => {
                debug!("configured file unreadable ({e}); trying bootstrap configuration");
                self.repository.read_bootstrap().await?
            }
        };
        Ok(parse_configuration(&text)?)
    }

    /// Returns the configuration with `devices` materialized from the registry,
    /// loading it first if nothing has been loaded yet.
    pub async fn get_configuration(&mut self) -> Configuration {
        if self.configuration.is_none() {
            self.load_configuration().await;
        }
        self.snapshot()
    }

    /// Replaces the configuration and registry with `config` and writes it to
    /// the current configuration path.
    ///
    /// For duplicate device ids in `config.devices` the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be rendered or written.  The
    /// in-memory state is replaced even when writing fails.
    pub async fn save_configuration(&mut self, mut config: Configuration) -> Result<(), StoreError> {
        let devices = std::mem::take(&mut config.devices);
        self.registry.replace_all(devices);
        self.configuration = Some(config);

        let text = render_configuration(&self.snapshot())?;
        self.repository.write_config(&self.config_path, &text).await?;
        info!(
            "saved {} devices to {}",
            self.registry.len(),
            self.config_path.display()
        );
        Ok(())
    }

    fn snapshot(&self) -> Configuration {
        let mut config = self.configuration.clone().unwrap_or_default();
        config.devices = self.registry.all();
        config
    }

    // ── Devices ───────────────────────────────────────────────────────────────

    /// Returns all devices, ordered by id.
    pub fn get_devices(&self) -> Vec<Device> {
        self.registry.all()
    }

    pub fn get_device(&self, id: &str) -> Option<Device> {
        self.registry.get(id).cloned()
    }

    /// Adds a device under a freshly generated `id_device_xxxxxxxx` id.
    ///
    /// An `id` in `fields` is ignored.
    pub fn create_device(&mut self, fields: DeviceFields) -> Device {
        let device = self.registry.create(fields);
        debug!("created device {}", device.id);
        device
    }

    /// Merges `partial` onto an existing device.  Returns `None` for unknown ids.
    pub fn update_device(&mut self, id: &str, partial: DeviceFields) -> Option<Device> {
        let updated = self.registry.update(id, partial);
        if updated.is_some() {
            debug!("updated device {id}");
        }
        updated
    }

    /// Removes a device.  Returns `false` for unknown ids.
    pub fn delete_device(&mut self, id: &str) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            debug!("deleted device {id}");
        }
        removed
    }

    /// Returns the distinct rooms of all devices, sorted ascending.
    pub fn get_rooms(&self) -> Vec<String> {
        self.registry.rooms()
    }

    // ── Settings ──────────────────────────────────────────────────────────────

    pub fn get_app_settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Merges `update` into the settings.
    ///
    /// A new non-empty `devicesFilePath` takes effect immediately: the
    /// configuration is reloaded from it, replacing the current devices.  An
    /// empty path is no change.  Settings are then persisted (best-effort).
    pub async fn update_app_settings(&mut self, update: AppSettingsUpdate) -> AppSettings {
        let path_changed = update.new_devices_file_path().is_some();
        self.settings.apply(update);

        if path_changed {
            self.config_path = PathBuf::from(&self.settings.devices_file_path);
            info!("devices file changed to {}", self.config_path.display());
            self.load_configuration().await;
        }

        self.save_app_settings().await;
        self.settings.clone()
    }

    pub fn get_devices_file_path(&self) -> &str {
        &self.settings.devices_file_path
    }

    /// Shorthand for [`ConfigStore::update_app_settings`] with only the path.
    pub async fn set_devices_file_path(&mut self, path: impl Into<String>) {
        self.update_app_settings(AppSettingsUpdate {
            devices_file_path: Some(path.into()),
        })
        .await;
    }

    /// Path the configuration is loaded from and saved to.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
