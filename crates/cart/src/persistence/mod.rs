//! Key-value persistence backends.
//!
//! The cart writes its snapshot through the [`PersistenceStore`] trait so the
//! storage primitive can be swapped per platform. Two backends ship here:
//! - [`MemoryStore`] - process-local map, shared between clones
//! - [`FileStore`] - one JSON file per key under a directory

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Asynchronous string key-value storage.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was stored.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}
