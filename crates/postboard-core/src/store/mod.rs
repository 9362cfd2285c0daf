//! Persistent key/value storage for the session.
//!
//! This module provides:
//! - `KeyValueStore`: the get/set/remove contract every backend implements
//! - `FileStore`: a JSON file on disk, one per API origin
//! - `MemoryStore`: an in-process map for tests and throwaway sessions
//! - `SessionStore`: typed access to the single persisted session record
//!
//! Values are strings; structured values are JSON-encoded by the caller.

pub mod file;
pub mod memory;
pub mod session;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::{SessionStore, SESSION_KEY};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored value for '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable string map. Implementations must be usable from any task.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
