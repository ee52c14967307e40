//! Infrastructure layer for the configuration manager.
//!
//! Contains the file-system adapter behind
//! [`crate::application::repository::ConfigRepository`].
//!
//! **Dependency rule**: this layer may depend on `application` and `y2m_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod storage;
