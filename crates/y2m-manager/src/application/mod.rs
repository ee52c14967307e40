//! Application layer: the configuration store and the seams it depends on.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure data types and the `module.exports` codec in `y2m_core`) and the
//! infrastructure (files on disk).
//!
//! Code in this layer:
//!
//! - **Orchestrates** domain objects to fulfil a user goal (e.g., "add a
//!   device and write the configuration file back").
//! - **Depends on abstractions** (the [`repository::ConfigRepository`] trait)
//!   rather than concrete implementations, so storage can be swapped without
//!   changing this code.
//! - **Contains no file system access** of its own.
//!
//! # Sub-modules
//!
//! - **`device_registry`** – The in-memory id → device map.
//!
//! - **`repository`** – The storage trait and its error type.
//!
//! - **`config_store`** – [`config_store::ConfigStore`], which keeps the
//!   registry, the loaded configuration and the app settings consistent with
//!   the files behind the repository.

pub mod config_store;
pub mod device_registry;
pub mod repository;
