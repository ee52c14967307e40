//! The configuration aggregate persisted in the yandex2mqtt `config.js` file.
//!
//! ```text
//! module.exports = {
//!     mqtt: { host: "localhost", port: 1883, user: "", password: "" },
//!     https: { privateKey: "", certificate: "", port: 443 },
//!     clients: [ ... ],
//!     users: [ ... ],
//!     devices: [ ... ],
//! };
//! ```
//!
//! Every section is optional on the way in: a missing section takes the value
//! produced by its `Default` impl, which is also the documented fallback used
//! when the file cannot be read at all.  Top-level keys the registry does not
//! know about are kept in [`Configuration::extra`] and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::device::Device;
use super::loose::{deserialize_port, deserialize_text};

/// Full configuration aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Configuration {
    #[serde(default)]
    pub mqtt: MqttSettings,
    #[serde(default)]
    pub https: HttpsSettings,
    /// OAuth clients allowed to talk to the bridge.  Opaque to the registry.
    #[serde(default)]
    pub clients: Vec<Value>,
    /// User accounts.  Opaque to the registry.
    #[serde(default)]
    pub users: Vec<Value>,
    #[serde(default)]
    pub devices: Vec<Device>,
    /// Unrecognised top-level keys, preserved for write-back.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// MQTT broker connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MqttSettings {
    #[serde(default = "default_mqtt_host", deserialize_with = "deserialize_text")]
    pub host: String,
    /// Accepts `1883` and `'1883'` alike.
    #[serde(default = "default_mqtt_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub user: String,
    /// Numeric passwords are kept as their text.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub password: String,
}

/// HTTPS listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpsSettings {
    /// Path to the PEM private key.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub private_key: String,
    /// Path to the PEM certificate chain.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub certificate: String,
    #[serde(default = "default_https_port", deserialize_with = "deserialize_port")]
    pub port: u16,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_mqtt_host() -> String {
    "localhost".to_string()
}
fn default_mqtt_port() -> u16 {
    1883
}
fn default_https_port() -> u16 {
    443
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            host: default_mqtt_host(),
            port: default_mqtt_port(),
            user: String::new(),
            password: String::new(),
        }
    }
}

impl Default for HttpsSettings {
    fn default() -> Self {
        Self {
            private_key: String::new(),
            certificate: String::new(),
            port: default_https_port(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
