//! Integration tests for the configuration store.
//!
//! These tests exercise `ConfigStore` end-to-end against real files:
//! `ConfigStore` + `FileRepository` + a temporary base directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio_test::assert_ok;
use uuid::Uuid;
use y2m_core::{is_generated_device_id, AppSettingsUpdate, Configuration, Device, DeviceFields};
use y2m_manager::{ConfigStore, FileRepository, StorePaths};

// ── Helpers ───────────────────────────────────────────────────────────────────

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("y2m_store_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        Self(dir)
    }

    fn path(&self) -> &Path {
        &self.0
    }

    fn file(&self, name: &str) -> String {
        self.0.join(name).to_string_lossy().into_owned()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn fields(value: Value) -> DeviceFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// Opens a store over `dir` with its settings pointing at `config_file`.
async fn open_store(dir: &TempDir, config_file: &str) -> ConfigStore {
    let settings = json!({ "devicesFilePath": dir.file(config_file) });
    std::fs::write(dir.path().join("app-settings.json"), settings.to_string()).expect("settings");
    let repository = Arc::new(FileRepository::new(StorePaths::in_dir(dir.path())));
    ConfigStore::open(repository).await
}

const HOME_CONFIG: &str = r#"// generated by hand
module.exports = {
    mqtt: { host: '192.168.1.10', port: 1883, user: 'mqtt', password: 'secret' },
    https: { privateKey: '/ssl/key.pem', certificate: '/ssl/cert.pem', port: 443 },
    clients: [{ id: '1', name: 'Yandex', clientId: 'c', clientSecret: 's', isTrusted: false }],
    users: [{ id: '1', username: 'admin', password: 'admin', name: 'Admin' }],
    devices: [
        { id: 'lamp', name: 'Lamp', room: 'Kitchen', mqtt: [{ instance: 'on', set: '/lamp/set' }] },
        { id: 'plug', name: 'Plug', room: 'Hall' },
        { id: 'fan', name: 'Fan', room: 'Kitchen' },
    ],
    // not part of the known schema
    logLevel: 'debug',
};
"#;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_open_reads_configuration_named_in_settings() {
    // Arrange
    let dir = TempDir::new();
    std::fs::write(dir.path().join("config.js"), HOME_CONFIG).unwrap();

    // Act
    let mut store = open_store(&dir, "config.js").await;
    let config = store.get_configuration().await;

    // Assert
    assert_eq!(config.mqtt.host, "192.168.1.10");
    assert_eq!(config.https.certificate, "/ssl/cert.pem");
    assert_eq!(config.users[0]["username"], "admin");
    assert_eq!(config.devices.len(), 3);
    assert_eq!(store.get_rooms(), ["Hall", "Kitchen"]);
}

#[tokio::test]
async fn test_missing_configuration_file_gives_defaults() {
    let dir = TempDir::new();

    let mut store = open_store(&dir, "absent.js").await;
    let config = store.get_configuration().await;

    assert_eq!(config.mqtt.host, "localhost");
    assert_eq!(config.mqtt.port, 1883);
    assert!(config.devices.is_empty());
    assert!(store.get_devices().is_empty());
}

#[tokio::test]
async fn test_bootstrap_file_used_when_configured_file_is_missing() {
    // Arrange
    let dir = TempDir::new();
    std::fs::create_dir_all(dir.path().join("attached_assets")).unwrap();
    std::fs::write(
        dir.path().join("attached_assets").join("config.bootstrap.js"),
        "module.exports = { devices: [{ id: 'seed', room: 'Hall' }] };",
    )
    .unwrap();

    // Act
    let store = open_store(&dir, "absent.js").await;

    // Assert
    assert_eq!(store.get_device("seed").map(|d| d.room), Some("Hall".to_string()));
}

#[tokio::test]
async fn test_crud_then_save_survives_reopen() {
    // Arrange
    let dir = TempDir::new();
    std::fs::write(dir.path().join("config.js"), HOME_CONFIG).unwrap();
    let mut store = open_store(&dir, "config.js").await;

    // Act
    let created = store.create_device(fields(json!({ "name": "Kettle", "room": "Kitchen" })));
    assert!(store.update_device("plug", fields(json!({ "room": "Bedroom" }))).is_some());
    assert!(store.delete_device("fan"));
    let config = store.get_configuration().await;
    assert_ok!(store.save_configuration(config).await);

    let mut reopened = open_store(&dir, "config.js").await;

    // Assert
    assert!(is_generated_device_id(&created.id));
    assert_eq!(reopened.get_device(&created.id), Some(created));
    assert_eq!(reopened.get_device("plug").unwrap().room, "Bedroom");
    assert!(reopened.get_device("fan").is_none());
    assert_eq!(reopened.get_rooms(), ["Bedroom", "Kitchen"]);

    let config = reopened.get_configuration().await;
    assert_eq!(config.mqtt.password, "secret");
    assert_eq!(config.clients.len(), 1);
    assert_eq!(config.extra["logLevel"], "debug");
    assert_eq!(
        reopened.get_device("lamp").unwrap().fields["mqtt"][0]["set"],
        "/lamp/set"
    );
}

#[tokio::test]
async fn test_save_collapses_duplicate_ids_to_last_occurrence() {
    // Arrange
    let dir = TempDir::new();
    let mut store = open_store(&dir, "nested/dir/config.js").await;
    let mut config = Configuration::default();
    config.devices = vec![
        Device::from_fields("a", fields(json!({ "room": "Hall", "name": "first" }))),
        Device::from_fields("b", fields(json!({ "room": "Hall" }))),
        Device::from_fields("a", fields(json!({ "room": "Attic", "name": "second" }))),
    ];

    // Act
    assert_ok!(store.save_configuration(config).await);
    let reopened = open_store(&dir, "nested/dir/config.js").await;

    // Assert
    let devices = reopened.get_devices();
    assert_eq!(devices.len(), 2);
    let a = reopened.get_device("a").expect("a survives");
    assert_eq!(a.room, "Attic");
    assert_eq!(a.fields["name"], "second");
}

#[tokio::test]
async fn test_saved_file_is_module_exports_text() {
    let dir = TempDir::new();
    let mut store = open_store(&dir, "config.js").await;
    store.create_device(fields(json!({ "room": "Hall" })));

    let config = store.get_configuration().await;
    assert_ok!(store.save_configuration(config).await);

    let text = std::fs::read_to_string(dir.path().join("config.js")).unwrap();
    assert!(text.starts_with("module.exports = {\n    mqtt: {"), "got {text}");
    assert!(text.trim_end().ends_with("};"));
}

#[tokio::test]
async fn test_switching_devices_file_reloads_and_persists_settings() {
    // Arrange
    let dir = TempDir::new();
    std::fs::write(dir.path().join("config.js"), HOME_CONFIG).unwrap();
    std::fs::write(
        dir.path().join("other.js"),
        "module.exports = { devices: [{ id: 'heater', room: 'Garage' }] };",
    )
    .unwrap();
    let mut store = open_store(&dir, "config.js").await;

    // Act
    let settings = store
        .update_app_settings(AppSettingsUpdate {
            devices_file_path: Some(dir.file("other.js")),
        })
        .await;

    // Assert
    assert_eq!(settings.devices_file_path, dir.file("other.js"));
    assert_eq!(store.get_devices_file_path(), dir.file("other.js"));
    let ids: Vec<String> = store.get_devices().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, ["heater"]);

    let raw = std::fs::read_to_string(dir.path().join("app-settings.json")).unwrap();
    let saved: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved["devicesFilePath"], dir.file("other.js"));
}

#[tokio::test]
async fn test_malformed_configuration_resets_to_defaults() {
    let dir = TempDir::new();
    std::fs::write(
        dir.path().join("config.js"),
        "module.exports = { devices: [{ id: 'a', run: process.exit(1) }] };",
    )
    .unwrap();

    let mut store = open_store(&dir, "config.js").await;

    assert!(store.get_devices().is_empty());
    assert_eq!(store.get_configuration().await, Configuration::default());
}

#[tokio::test]
async fn test_unknown_ids_leave_store_unchanged() {
    let dir = TempDir::new();
    std::fs::write(dir.path().join("config.js"), HOME_CONFIG).unwrap();
    let mut store = open_store(&dir, "config.js").await;
    let before = store.get_devices();

    assert!(store.update_device("ghost", fields(json!({ "room": "Attic" }))).is_none());
    assert!(!store.delete_device("ghost"));
    assert_eq!(store.get_devices(), before);
}

#[tokio::test]
async fn test_loosely_typed_file_keeps_devices_through_a_mutation() {
    // Arrange
    let dir = TempDir::new();
    std::fs::write(
        dir.path().join("config.js"),
        "module.exports = {
            mqtt: { host: 'broker', port: '1884' },
            devices: [{ id: 'a', room: null }, { id: 'b', room: 3 }, { id: 7, room: 'Hall' }],
        };",
    )
    .unwrap();
    let mut store = open_store(&dir, "config.js").await;

    // Act: a mutation writes the whole file back
    store.create_device(fields(json!({ "room": "Attic" })));
    let config = store.get_configuration().await;
    assert_ok!(store.save_configuration(config).await);
    let mut reopened = open_store(&dir, "config.js").await;

    // Assert
    assert_eq!(reopened.get_devices().len(), 4);
    assert_eq!(reopened.get_device("7").map(|d| d.room), Some("Hall".to_string()));
    assert_eq!(reopened.get_device("b").map(|d| d.room), Some("3".to_string()));
    let config = reopened.get_configuration().await;
    assert_eq!(config.mqtt.host, "broker");
    assert_eq!(config.mqtt.port, 1884);
}
