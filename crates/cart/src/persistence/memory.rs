//! In-memory persistence backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PersistenceError, PersistenceStore};

/// Process-local key-value store.
///
/// Clones share the same map, so a cart built on a clone sees everything
/// written through the original. Writes can be made to fail on demand to
/// exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    values: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `set` calls fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Read a value without going through the trait.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.inner.values.read().await.get(key).cloned()
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.inner.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Backend(format!(
                "writes disabled for key {key}"
            )));
        }

        self.inner
            .values
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_clones_share_values() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").await.unwrap();
        assert_eq!(other.peek("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_fail_writes() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        assert!(matches!(
            store.set("k", "v").await,
            Err(PersistenceError::Backend(_))
        ));
        assert_eq!(store.peek("k").await, None);

        store.fail_writes(false);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.peek("k").await.as_deref(), Some("v"));
    }
}
