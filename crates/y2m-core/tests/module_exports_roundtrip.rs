//! Integration tests for the `module.exports` codec.
//!
//! These tests run realistic, hand-written config files through the public
//! API: extraction, literal parsing, schema mapping and rendering together.

use serde_json::json;
use y2m_core::{
    module_exports::{extract_object_literal, ModuleExportsError},
    parse_configuration, render_configuration, Configuration, Device,
};

/// A config file in the shape yandex2mqtt ships, comments and all.
const SAMPLE_CONFIG: &str = r#"// yandex2mqtt configuration
module.exports = {
    mqtt: {
        host: 'localhost',
        port: 1883,
        user: 'alex1ia',
        password: 'p}ss{word', // braces inside a string
    },
    https: {
        privateKey: '/etc/letsencrypt/live/example/privkey.pem',
        certificate: '/etc/letsencrypt/live/example/fullchain.pem',
        port: 4433,
    },
    clients: [
        {
            id: '1',
            name: 'Yandex',
            clientId: 'client',
            clientSecret: 'secret',
            isTrusted: false,
        },
    ],
    users: [
        { id: '1', username: 'admin', password: 'admin', name: 'Administrator' },
    ],
    devices: [
        {
            id: 'lamp-hall',
            name: 'Hall lamp',
            room: 'Hall',
            type: 'devices.types.light',
            mqtt: [
                { instance: 'on', set: '/hall/lamp/set', state: '/hall/lamp/state' },
            ],
            capabilities: [
                { type: 'devices.capabilities.on_off', retrievable: true },
            ],
        },
        {
            id: 'kettle',
            name: 'Kettle',
            room: 'Kitchen',
            type: 'devices.types.cooking.kettle',
            meta: { limits: { min: 40, max: 100 } },
        },
    ],
};
"#;

fn device<'a>(config: &'a Configuration, id: &str) -> &'a Device {
    config
        .devices
        .iter()
        .find(|d| d.id == id)
        .unwrap_or_else(|| panic!("device {id} missing"))
}

#[test]
fn test_sample_config_parses_all_sections() {
    let config = parse_configuration(SAMPLE_CONFIG).expect("sample must parse");

    assert_eq!(config.mqtt.host, "localhost");
    assert_eq!(config.mqtt.port, 1883);
    assert_eq!(config.mqtt.user, "alex1ia");
    assert_eq!(config.mqtt.password, "p}ss{word");
    assert_eq!(config.https.port, 4433);
    assert!(config.https.private_key.ends_with("privkey.pem"));
    assert_eq!(config.clients.len(), 1);
    assert_eq!(config.clients[0]["clientSecret"], "secret");
    assert_eq!(config.users[0]["username"], "admin");
    assert_eq!(config.devices.len(), 2);
}

#[test]
fn test_sample_config_keeps_opaque_device_fields() {
    let config = parse_configuration(SAMPLE_CONFIG).expect("sample must parse");

    let lamp = device(&config, "lamp-hall");
    assert_eq!(lamp.room, "Hall");
    assert_eq!(lamp.fields["type"], "devices.types.light");
    assert_eq!(lamp.fields["mqtt"][0]["set"], "/hall/lamp/set");

    let kettle = device(&config, "kettle");
    assert_eq!(kettle.fields["meta"], json!({"limits": {"min": 40, "max": 100}}));
}

#[test]
fn test_nested_devices_are_not_truncated_at_inner_brace() {
    // Arrange
    let text = r#"module.exports = { devices: [{id:"a", meta:{x:{y:1}}}, {id:"b"}] };"#;

    // Act
    let span = extract_object_literal(text).expect("marker present");
    let config = parse_configuration(text).expect("must parse");

    // Assert
    assert!(span.ends_with("}] }"), "span was {span}");
    assert_eq!(config.devices.len(), 2);
    assert_eq!(config.devices[0].fields["meta"]["x"]["y"], 1);
}

#[test]
fn test_rendered_sample_parses_back_to_same_configuration() {
    // Arrange
    let original = parse_configuration(SAMPLE_CONFIG).expect("sample must parse");

    // Act
    let rendered = render_configuration(&original).expect("render");
    let restored = parse_configuration(&rendered).expect("rendered text must parse");

    // Assert
    assert_eq!(original, restored);
}

#[test]
fn test_rendered_file_uses_unquoted_keys() {
    let config = parse_configuration(SAMPLE_CONFIG).expect("sample must parse");
    let rendered = render_configuration(&config).expect("render");

    assert!(rendered.starts_with("module.exports = {\n    mqtt: {\n        host: \"localhost\""));
    assert!(rendered.contains("        privateKey: "));
    assert!(!rendered.contains("\"devices\":"));
}

#[test]
fn test_executable_code_is_rejected_not_run() {
    let text = "module.exports = { mqtt: require('./mqtt.json') };";
    let result = parse_configuration(text);
    assert!(matches!(result, Err(ModuleExportsError::Literal(_))));
}

#[test]
fn test_sections_may_be_omitted() {
    let config = parse_configuration("module.exports = {};").expect("empty object parses");
    assert_eq!(config, Configuration::default());
}

#[test]
fn test_loosely_typed_values_parse_instead_of_failing() {
    // Arrange: the kind of values a hand-edited file ends up with
    let text = r#"module.exports = {
        mqtt: { host: 'broker', port: '1883', password: 4711 },
        https: { port: 8443 },
        devices: [
            { id: 'a', room: null },
            { id: 'b', room: 5, name: 'Plug' },
            { id: 7, room: 'Hall' },
        ],
    };"#;

    // Act
    let config = parse_configuration(text).expect("loose values must parse");

    // Assert
    assert_eq!(config.mqtt.port, 1883);
    assert_eq!(config.mqtt.password, "4711");
    assert_eq!(config.https.port, 8443);
    assert_eq!(device(&config, "a").room, "");
    assert_eq!(device(&config, "b").room, "5");
    assert_eq!(device(&config, "b").fields["name"], "Plug");
    assert_eq!(device(&config, "7").room, "Hall");
}

#[test]
fn test_loosely_typed_file_renders_back_with_string_values() {
    let text = "module.exports = { devices: [{ id: 7, room: null }] };";
    let config = parse_configuration(text).expect("must parse");

    let rendered = render_configuration(&config).expect("render");

    assert!(rendered.contains("id: \"7\""), "got {rendered}");
    assert!(rendered.contains("room: \"\""), "got {rendered}");
}
