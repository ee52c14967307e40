//! Lenient field deserializers for hand-authored config values.
//!
//! The config file is edited by people, and JavaScript does not care whether a
//! port is `1883` or `'1883'`, or whether a room is `null`.  The typed fields of
//! the domain accept those spellings instead of rejecting the whole file.
//!
//! | Field kind | Accepted                                   | Stored as            |
//! |------------|--------------------------------------------|----------------------|
//! | text       | string, number, bool, `null`               | `String` (`null` → `""`) |
//! | port       | integer, integral float, numeric string    | `u16`                |

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Converts a scalar value into its text.  `null` becomes the empty string;
/// anything else that is not a string keeps its literal JSON text.
pub(crate) fn text_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reads a port from a number or a numeric string.
fn port_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0 && *float >= 0.0)
                    .map(|float| float as u64)
            })
            .and_then(|port| u16::try_from(port).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(text_value)
}

pub(crate) fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    port_value(&value).ok_or_else(|| D::Error::custom(format!("invalid port {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_value_converts_scalars() {
        assert_eq!(text_value(json!("Hall")), "Hall");
        assert_eq!(text_value(json!(null)), "");
        assert_eq!(text_value(json!(5)), "5");
        assert_eq!(text_value(json!(true)), "true");
    }

    #[test]
    fn test_port_value_accepts_numbers_and_numeric_strings() {
        assert_eq!(port_value(&json!(1883)), Some(1883));
        assert_eq!(port_value(&json!(443.0)), Some(443));
        assert_eq!(port_value(&json!("1883")), Some(1883));
        assert_eq!(port_value(&json!(" 8883 ")), Some(8883));
    }

    #[test]
    fn test_port_value_rejects_out_of_range_and_garbage() {
        assert_eq!(port_value(&json!(70000)), None);
        assert_eq!(port_value(&json!(-1)), None);
        assert_eq!(port_value(&json!(1.5)), None);
        assert_eq!(port_value(&json!("http")), None);
        assert_eq!(port_value(&json!(null)), None);
    }
}
