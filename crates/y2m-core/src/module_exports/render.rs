//! Writes values back out in the `module.exports` style.
//!
//! The output looks like `JSON.stringify(value, null, 4)` with the quotes
//! stripped from object keys, which is how yandex2mqtt config files are
//! usually written by hand:
//!
//! ```text
//! {
//!     mqtt: {
//!         host: "localhost",
//!         port: 1883
//!     },
//!     clients: []
//! }
//! ```
//!
//! Keys that are not valid identifiers (`"a-b"`, `"10"`) keep their quotes so
//! the file stays readable by [`super::parse_literal`].

use serde_json::Value;

use super::literal::is_identifier;

const INDENT: &str = "    ";

/// Renders `value` as a multi-line object/array literal.
pub fn render_literal(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_key(out, key);
                out.push_str(": ");
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            out.push(']');
        }
        // Scalars print as JSON: strings escaped and double-quoted.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_key(out: &mut String, key: &str) {
    if is_identifier(key) {
        out.push_str(key);
    } else {
        out.push_str(&Value::from(key).to_string());
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
