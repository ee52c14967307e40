//! Codec for the `module.exports = { ... };` configuration file.
//!
//! Reading a config file is a three-step pipeline:
//!
//! ```text
//! text ──extract──► "{ ... }" ──parse_literal──► serde_json::Value ──serde──► Configuration
//! ```
//!
//! Writing goes the other way: `Configuration` → `Value` → [`render_literal`]
//! → wrapped in the `module.exports = ...;` envelope.  A file produced by
//! [`render_configuration`] is always readable by [`parse_configuration`].

pub mod extract;
pub mod literal;
pub mod render;

pub use extract::{extract_object_literal, find_matching_brace, EXPORT_MARKER};
pub use literal::{parse_literal, LiteralError, LiteralErrorKind};
pub use render::render_literal;

use thiserror::Error;

use crate::domain::Configuration;

/// Error type for reading or writing a configuration file.
#[derive(Debug, Error)]
pub enum ModuleExportsError {
    /// The text contains no `module.exports = {`.
    #[error("no `{}` found", EXPORT_MARKER)]
    MissingExportMarker,

    /// The exported object is not a valid data literal.
    #[error("invalid object literal: {0}")]
    Literal(#[from] LiteralError),

    /// The literal parsed but does not have the configuration's shape.
    #[error("configuration does not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),

    /// The configuration could not be converted for writing.
    #[error("failed to render configuration: {0}")]
    Render(#[source] serde_json::Error),
}

/// Parses the configuration exported by a `module.exports` file.
///
/// # Errors
///
/// Returns [`ModuleExportsError::MissingExportMarker`] if the text has no
/// export, [`ModuleExportsError::Literal`] on a syntax error (including an
/// object whose braces never balance) and [`ModuleExportsError::Schema`] when
/// a known section has the wrong type.
///
/// # Examples
///
/// ```rust
/// use y2m_core::module_exports::parse_configuration;
///
/// let text = "module.exports = { mqtt: { host: 'broker' }, devices: [{ id: 'a', room: 'Hall' }] };";
/// let config = parse_configuration(text).unwrap();
/// assert_eq!(config.mqtt.host, "broker");
/// assert_eq!(config.devices[0].room, "Hall");
/// ```
pub fn parse_configuration(text: &str) -> Result<Configuration, ModuleExportsError> {
    let literal = extract_object_literal(text).ok_or(ModuleExportsError::MissingExportMarker)?;
    let value = parse_literal(literal)?;
    serde_json::from_value(value).map_err(ModuleExportsError::Schema)
}

/// Renders `config` as the full text of a `module.exports` file.
///
/// # Errors
///
/// Returns [`ModuleExportsError::Render`] if the configuration cannot be
/// converted to a value tree.
pub fn render_configuration(config: &Configuration) -> Result<String, ModuleExportsError> {
    let value = serde_json::to_value(config).map_err(ModuleExportsError::Render)?;
    Ok(format!("module.exports = {};\n", render_literal(&value)))
}
