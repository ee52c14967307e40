//! y2m-manager library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::config_store::{ConfigStore, StoreError};
pub use application::repository::{ConfigRepository, StorageError};
pub use infrastructure::storage::{FileRepository, StorePaths};
