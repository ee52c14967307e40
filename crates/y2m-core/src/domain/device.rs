//! Device records and the merge rules applied to them.
//!
//! A yandex2mqtt device entry carries a handful of well-known keys (`name`,
//! `type`, `mqtt`, `capabilities`, ...) but the registry only *interprets* two
//! of them:
//!
//! - `id`   – the unique key of the record inside the registry.
//! - `room` – used to derive the room list shown to the user.
//!
//! Everything else is kept verbatim in [`Device::fields`] so that a record read
//! from the config file is written back exactly as the user authored it.
//!
//! # Serde flattening (for beginners)
//!
//! `#[serde(flatten)]` merges the keys of a map into the surrounding object.
//! A file entry such as
//!
//! ```text
//! { id: "lamp", room: "Hall", name: "Lamp", type: "devices.types.light" }
//! ```
//!
//! deserializes into `Device { id: "lamp", room: "Hall", fields: {name, type} }`
//! and serializes back to the same flat object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::loose::{deserialize_text, text_value};

/// Prefix that marks an identifier as a generated device id.
pub const DEVICE_ID_PREFIX: &str = "id_device_";

/// Number of UUID hex characters appended to [`DEVICE_ID_PREFIX`].
const DEVICE_ID_SUFFIX_LEN: usize = 8;

/// Opaque key/value data describing a device, in authoring order.
pub type DeviceFields = Map<String, Value>;

/// A device record as stored in the registry and in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    /// Unique identifier; the registry key.  A numeric id is read as its text.
    #[serde(deserialize_with = "deserialize_text")]
    pub id: String,
    /// Room the device belongs to.  Empty when the file omits it or sets `null`.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub room: String,
    /// Every other key of the record, kept verbatim.
    #[serde(flatten)]
    pub fields: DeviceFields,
}

impl Device {
    /// Builds a device from loose input fields under the given `id`.
    ///
    /// Any `id` present in `fields` is discarded: the supplied `id` always
    /// wins.  A `room` entry is lifted into [`Device::room`].
    pub fn from_fields(id: impl Into<String>, mut fields: DeviceFields) -> Self {
        fields.remove("id");
        let room = fields.remove("room").map(text_value).unwrap_or_default();
        Self {
            id: id.into(),
            room,
            fields,
        }
    }

    /// Returns a copy of this device with `partial` merged on top.
    ///
    /// Keys in `partial` overwrite existing ones; the `id` is immutable and an
    /// `id` key in `partial` is ignored.
    pub fn merged(&self, partial: DeviceFields) -> Self {
        let mut merged = self.clone();
        for (key, value) in partial {
            match key.as_str() {
                "id" => {}
                "room" => merged.room = text_value(value),
                _ => {
                    merged.fields.insert(key, value);
                }
            }
        }
        merged
    }
}

/// Generates a fresh device identifier, e.g. `id_device_3f2a9c1b`.
///
/// The suffix is the leading hex of a random v4 UUID.  Callers that need a
/// guaranteed-unique id must still check it against their registry.
pub fn generate_device_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{DEVICE_ID_PREFIX}{}", &uuid[..DEVICE_ID_SUFFIX_LEN])
}

/// Returns `true` if `id` has the shape produced by [`generate_device_id`].
pub fn is_generated_device_id(id: &str) -> bool {
    id.strip_prefix(DEVICE_ID_PREFIX).is_some_and(|suffix| {
        suffix.len() == DEVICE_ID_SUFFIX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
