//! # y2m-core
//!
//! Shared library for y2m containing the configuration domain types and the
//! codec for yandex2mqtt's `module.exports` config file.
//!
//! It has no dependencies on the file system, async runtimes or the CLI.
//!
//! # Architecture overview (for beginners)
//!
//! yandex2mqtt bridges smart-home devices to an MQTT broker.  Its whole setup
//! lives in one hand-edited JavaScript file:
//!
//! ```text
//! module.exports = {
//!     mqtt: { ... },
//!     https: { ... },
//!     clients: [ ... ],
//!     users: [ ... ],
//!     devices: [ { id: "...", room: "...", ... }, ... ],
//! };
//! ```
//!
//! This crate defines:
//!
//! - **`domain`** – `Device`, `Configuration` and `AppSettings`, with the
//!   defaults used when nothing can be loaded.
//!
//! - **`module_exports`** – how that file is read without running it: the
//!   exported object is located by brace matching and parsed by a strict
//!   data-only literal parser, then written back in the same style.

pub mod domain;
pub mod module_exports;

pub use domain::{
    generate_device_id, is_generated_device_id, AppSettings, AppSettingsUpdate, Configuration,
    Device, DeviceFields, HttpsSettings, MqttSettings, DEFAULT_DEVICES_FILE_PATH,
    DEVICE_ID_PREFIX,
};
pub use module_exports::{
    parse_configuration, parse_literal, render_configuration, ModuleExportsError,
};
