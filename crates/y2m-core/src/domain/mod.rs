//! Domain layer: pure data types with no I/O.
//!
//! - **`device`**        – the `Device` record, id generation and merge rules.
//! - **`configuration`** – the `module.exports` aggregate (mqtt, https, clients,
//!   users, devices) and its documented defaults.
//! - **`loose`**         – lenient deserializers for hand-typed values.
//! - **`settings`**      – `AppSettings`, the pointer to the configuration file.

pub mod configuration;
pub mod device;
mod loose;
pub mod settings;

pub use configuration::{Configuration, HttpsSettings, MqttSettings};
pub use device::{generate_device_id, is_generated_device_id, Device, DeviceFields, DEVICE_ID_PREFIX};
pub use settings::{AppSettings, AppSettingsUpdate, DEFAULT_DEVICES_FILE_PATH};
