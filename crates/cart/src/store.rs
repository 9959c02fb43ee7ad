//! Cart store shared across the application.
//!
//! Mutations are applied synchronously to the in-memory cart. Each one then
//! enqueues a full snapshot of the post-mutation cart on a FIFO queue drained
//! by a single background task, so stored snapshots are written in the same
//! order the mutations happened and the last write always reflects the
//! latest in-memory state.
//!
//! The same task loads the stored snapshot at startup before it processes
//! any writes. Until that finishes the cart reads as empty.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use go_marketplace_core::{LineItem, Price, ProductDescriptor, ProductId};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::error::Result;
use crate::persistence::{FileStore, PersistenceStore};
use crate::snapshot::{self, CART_SNAPSHOT_KEY};

/// Handle to a cart store.
///
/// This struct is cheaply cloneable via `Arc`; all clones share the same
/// cart. Construct one per session and pass it to whatever needs the cart.
/// The background persistence task stops once every clone is dropped.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    state: Arc<RwLock<CartState>>,
    writes: mpsc::UnboundedSender<WriteCommand>,
    loaded: watch::Receiver<bool>,
    snapshot_key: String,
}

#[derive(Default)]
struct CartState {
    cart: Cart,
    /// Set by the first mutation. A snapshot loaded after that is discarded.
    touched: bool,
}

enum WriteCommand {
    Persist(String),
    Flush(oneshot::Sender<()>),
}

impl CartStore {
    /// Create a store persisting under [`CART_SNAPSHOT_KEY`].
    ///
    /// Loading the stored snapshot starts in the background; this returns
    /// immediately. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(persistence: Arc<dyn PersistenceStore>) -> Self {
        Self::spawn_with_key(persistence, CART_SNAPSHOT_KEY)
    }

    /// Create a store persisting under a custom key.
    #[must_use]
    pub fn spawn_with_key(
        persistence: Arc<dyn PersistenceStore>,
        snapshot_key: impl Into<String>,
    ) -> Self {
        let snapshot_key = snapshot_key.into();
        let state = Arc::new(RwLock::new(CartState::default()));
        let (writes, queue) = mpsc::unbounded_channel();
        let (loaded_tx, loaded) = watch::channel(false);

        tokio::spawn(run_persistence(
            persistence,
            snapshot_key.clone(),
            Arc::clone(&state),
            queue,
            loaded_tx,
        ));

        Self {
            inner: Arc::new(CartStoreInner {
                state,
                writes,
                loaded,
                snapshot_key,
            }),
        }
    }

    /// Create a file-backed store from configuration.
    #[must_use]
    pub fn from_config(config: &CartConfig) -> Self {
        let persistence = Arc::new(FileStore::new(config.storage_dir.clone()));
        Self::spawn_with_key(persistence, config.snapshot_key.clone())
    }

    /// Create a store and wait until the stored snapshot has been loaded.
    pub async fn open(persistence: Arc<dyn PersistenceStore>) -> Self {
        let store = Self::spawn(persistence);
        store.wait_until_loaded().await;
        store
    }

    /// Key the snapshot is stored under.
    #[must_use]
    pub fn snapshot_key(&self) -> &str {
        &self.inner.snapshot_key
    }

    /// Whether the startup load has finished (successfully or not).
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        *self.inner.loaded.borrow()
    }

    /// Wait for the startup load to finish.
    pub async fn wait_until_loaded(&self) {
        let mut loaded = self.inner.loaded.clone();
        // Err means the task is gone, in which case there is nothing to wait for
        let _ = loaded.wait_for(|done| *done).await;
    }

    /// Wait until every snapshot enqueued before this call has been written.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.inner.writes.send(WriteCommand::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current line items, in insertion order.
    #[must_use]
    pub fn products(&self) -> Vec<LineItem> {
        self.read_state().cart.items().to_vec()
    }

    /// Copy of the whole cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.read_state().cart.clone()
    }

    /// Current line for a product, if any.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<LineItem> {
        self.read_state().cart.get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read_state().cart.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_state().cart.is_empty()
    }

    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.read_state().cart.total_quantity()
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.read_state().cart.subtotal()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product, creating its line if needed.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(&self, product: ProductDescriptor) {
        let quantity = self.apply(|cart| cart.add(product));
        debug!(quantity = quantity.get(), "Added to cart");
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the product is not in the cart.
    /// Nothing is changed or written in that case.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub fn increment(&self, id: &ProductId) -> Result<()> {
        let quantity = self
            .try_apply(|cart| cart.increment(id))
            .inspect_err(|e| warn!(error = %e, "Increment ignored"))?;
        debug!(quantity = quantity.get(), "Incremented");
        Ok(())
    }

    /// Remove one unit from an existing line; the line goes away at zero.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the product is not in the cart.
    /// Nothing is changed or written in that case.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub fn decrement(&self, id: &ProductId) -> Result<()> {
        let remaining = self
            .try_apply(|cart| cart.decrement(id))
            .inspect_err(|e| warn!(error = %e, "Decrement ignored"))?;
        match remaining {
            Some(quantity) => debug!(quantity = quantity.get(), "Decremented"),
            None => debug!("Removed last unit"),
        }
        Ok(())
    }

    /// Remove a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the product is not in the cart.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub fn remove(&self, id: &ProductId) -> Result<()> {
        let removed = self
            .try_apply(|cart| cart.remove(id))
            .inspect_err(|e| warn!(error = %e, "Remove ignored"))?;
        debug!(quantity = removed.quantity.get(), "Removed line");
        Ok(())
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        self.apply(Cart::clear);
        debug!("Cleared cart");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read_state(&self) -> RwLockReadGuard<'_, CartState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CartState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply<T>(&self, f: impl FnOnce(&mut Cart) -> T) -> T {
        let mut state = self.write_state();
        let out = f(&mut state.cart);
        state.touched = true;
        // Enqueue under the lock so queue order matches mutation order
        self.enqueue_snapshot(state.cart.items());
        out
    }

    fn try_apply<T>(&self, f: impl FnOnce(&mut Cart) -> Result<T>) -> Result<T> {
        let mut state = self.write_state();
        let out = f(&mut state.cart)?;
        state.touched = true;
        self.enqueue_snapshot(state.cart.items());
        Ok(out)
    }

    fn enqueue_snapshot(&self, items: &[LineItem]) {
        match snapshot::encode(items) {
            Ok(raw) => {
                if self.inner.writes.send(WriteCommand::Persist(raw)).is_err() {
                    warn!("Persistence task stopped, snapshot not written");
                }
            }
            Err(e) => error!(error = %e, "Failed to encode cart snapshot"),
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("snapshot_key", &self.inner.snapshot_key)
            .field("items", &self.len())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

// =============================================================================
// Background Persistence
// =============================================================================

/// Load the stored snapshot, then write queued snapshots until the store is dropped.
async fn run_persistence(
    persistence: Arc<dyn PersistenceStore>,
    key: String,
    state: Arc<RwLock<CartState>>,
    mut queue: mpsc::UnboundedReceiver<WriteCommand>,
    loaded: watch::Sender<bool>,
) {
    hydrate(persistence.as_ref(), &key, &state).await;
    loaded.send_replace(true);

    while let Some(command) = queue.recv().await {
        match command {
            WriteCommand::Persist(raw) => match persistence.set(&key, &raw).await {
                Ok(()) => debug!(key = %key, bytes = raw.len(), "Persisted cart snapshot"),
                Err(e) => error!(key = %key, error = %e, "Failed to persist cart snapshot"),
            },
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!(key = %key, "Cart store dropped, persistence task exiting");
}

async fn hydrate(persistence: &dyn PersistenceStore, key: &str, state: &RwLock<CartState>) {
    let raw = match persistence.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key = %key, "No stored cart snapshot");
            return;
        }
        Err(e) => {
            error!(key = %key, error = %e, "Failed to load cart snapshot");
            return;
        }
    };

    let cart = match snapshot::decode(&raw) {
        Ok(cart) => cart,
        Err(e) => {
            error!(key = %key, error = %e, "Discarding unreadable cart snapshot");
            return;
        }
    };

    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    if guard.touched {
        warn!(
            key = %key,
            stored_items = cart.len(),
            "Cart changed before snapshot loaded, keeping in-memory cart"
        );
        return;
    }

    info!(key = %key, items = cart.len(), "Restored cart from snapshot");
    guard.cart = cart;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::Quantity;

    use super::*;
    use crate::error::CartError;
    use crate::persistence::MemoryStore;

    fn product(id: &str) -> ProductDescriptor {
        ProductDescriptor::new(id, format!("Product {id}"), "u", Price::from_cents(1000))
    }

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    async fn stored(backend: &MemoryStore) -> Cart {
        snapshot::decode(&backend.peek(CART_SNAPSHOT_KEY).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_starts_empty_without_snapshot() {
        let backend = MemoryStore::new();
        let store = CartStore::open(Arc::new(backend.clone())).await;

        assert!(store.is_loaded());
        assert!(store.is_empty());
        assert_eq!(backend.peek(CART_SNAPSHOT_KEY).await, None);
    }

    #[tokio::test]
    async fn test_persists_post_mutation_state() {
        let backend = MemoryStore::new();
        let store = CartStore::open(Arc::new(backend.clone())).await;

        store.add_to_cart(product("a"));
        store.flush().await;
        assert_eq!(stored(&backend).await.len(), 1);

        store.increment(&pid("a")).unwrap();
        store.flush().await;
        assert_eq!(
            stored(&backend).await.get(&pid("a")).unwrap().quantity.get(),
            2
        );

        store.decrement(&pid("a")).unwrap();
        store.decrement(&pid("a")).unwrap();
        store.flush().await;
        assert!(stored(&backend).await.is_empty());
    }

    #[tokio::test]
    async fn test_rapid_mutations_converge_to_latest() {
        let backend = MemoryStore::new();
        let store = CartStore::open(Arc::new(backend.clone())).await;

        for _ in 0..50 {
            store.add_to_cart(product("a"));
        }
        store.add_to_cart(product("b"));
        store.flush().await;

        assert_eq!(stored(&backend).await, store.cart());
        assert_eq!(store.total_quantity(), 51);
    }

    #[tokio::test]
    async fn test_unknown_id_changes_nothing() {
        let backend = MemoryStore::new();
        let store = CartStore::open(Arc::new(backend.clone())).await;

        assert_eq!(
            store.increment(&pid("ghost")),
            Err(CartError::ItemNotFound(pid("ghost")))
        );
        assert_eq!(
            store.decrement(&pid("ghost")),
            Err(CartError::ItemNotFound(pid("ghost")))
        );
        store.flush().await;

        assert!(store.is_empty());
        assert_eq!(backend.peek(CART_SNAPSHOT_KEY).await, None);
    }

    #[tokio::test]
    async fn test_hydrates_from_snapshot() {
        let backend = MemoryStore::new();
        backend
            .set(
                CART_SNAPSHOT_KEY,
                r#"[{"id":"p1","title":"Shirt","image_url":"u","price":50,"quantity":2}]"#,
            )
            .await
            .unwrap();

        let store = CartStore::open(Arc::new(backend)).await;

        let item = store.get(&pid("p1")).unwrap();
        assert_eq!(item.quantity, Quantity::new(2).unwrap());
        assert_eq!(store.subtotal(), Price::from_cents(10000));
    }

    #[tokio::test]
    async fn test_unreadable_snapshot_starts_empty() {
        let backend = MemoryStore::new();
        backend.set(CART_SNAPSHOT_KEY, "{not json").await.unwrap();

        let store = CartStore::open(Arc::new(backend)).await;
        assert!(store.is_loaded());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mutation_before_load_wins() {
        let backend = MemoryStore::new();
        backend
            .set(
                CART_SNAPSHOT_KEY,
                r#"[{"id":"old","title":"Old","image_url":"u","price":1,"quantity":5}]"#,
            )
            .await
            .unwrap();

        // current_thread runtime: the load task has not run yet
        let store = CartStore::spawn(Arc::new(backend.clone()));
        store.add_to_cart(product("new"));
        store.wait_until_loaded().await;
        store.flush().await;

        assert!(store.get(&pid("old")).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(stored(&backend).await, store.cart());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let backend = MemoryStore::new();
        let store = CartStore::open(Arc::new(backend.clone())).await;

        backend.fail_writes(true);
        store.add_to_cart(product("a"));
        store.flush().await;

        assert_eq!(store.len(), 1);
        assert_eq!(backend.peek(CART_SNAPSHOT_KEY).await, None);

        backend.fail_writes(false);
        store.increment(&pid("a")).unwrap();
        store.flush().await;
        assert_eq!(
            stored(&backend).await.get(&pid("a")).unwrap().quantity.get(),
            2
        );
    }

    #[tokio::test]
    async fn test_custom_snapshot_key() {
        let backend = MemoryStore::new();
        let store = CartStore::spawn_with_key(Arc::new(backend.clone()), "@Test:cart");
        store.wait_until_loaded().await;

        store.add_to_cart(product("a"));
        store.flush().await;

        assert_eq!(store.snapshot_key(), "@Test:cart");
        assert!(backend.peek("@Test:cart").await.is_some());
        assert_eq!(backend.peek(CART_SNAPSHOT_KEY).await, None);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_cart() {
        let backend = MemoryStore::new();
        let store = CartStore::open(Arc::new(backend.clone())).await;

        store.add_to_cart(product("a"));
        store.add_to_cart(product("b"));
        store.remove(&pid("a")).unwrap();
        store.clear();
        store.flush().await;

        assert!(store.is_empty());
        assert_eq!(backend.peek(CART_SNAPSHOT_KEY).await.as_deref(), Some("[]"));
    }
}
