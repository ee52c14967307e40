//! Storage infrastructure: settings, bootstrap and configuration files.
//!
//! The `files` sub-module handles:
//!
//! - Reading and writing `app-settings.json` in the base directory.
//! - Reading the bootstrap configuration shipped under `attached_assets/`.
//! - Reading and writing the `module.exports` configuration file, creating
//!   its directory on first save.

pub mod files;

pub use files::{FileRepository, StorePaths};
