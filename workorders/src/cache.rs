//! In-process memoization of fetched resources
//!
//! One `ResourceCache` per resource kind, owned by the client for the
//! lifetime of a run. Entries are write-once: the first value stored under a
//! key is the one every later lookup sees. There is no TTL, eviction or
//! invalidation.
//!
//! Keys follow `"<parent>/<id>"`; the listing of a parent lives under
//! `"<parent>/"`. Each key owns its own `OnceCell`, so concurrent
//! resolutions of the same key perform at most one fetch without
//! serializing unrelated keys.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::OnceCell;

use crate::types::{Analysis, AppVersion, TaskGroup, WorkOrderType};

/// Key of an item scoped to a parent.
pub fn item_key(parent: &str, id: &str) -> String {
    format!("{parent}/{id}")
}

/// Key of the full listing for a parent.
pub fn listing_key(parent: &str) -> String {
    item_key(parent, "")
}

struct Slots<V> {
    cells: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
}

impl<V> Default for Slots<V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Slots<V> {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<V>>>> {
        // A poisoned map is still consistent: values are only ever inserted
        self.cells.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cell(&self, key: &str) -> Arc<OnceCell<V>> {
        self.lock().entry(key.to_string()).or_default().clone()
    }

    fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key).and_then(|cell| cell.get().cloned())
    }

    fn put(&self, key: &str, value: V) -> bool {
        self.cell(key).set(value).is_ok()
    }

    async fn get_or_try_init<E, F, Fut>(&self, key: &str, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(key);
        cell.get_or_try_init(init).await.cloned()
    }

    fn len(&self) -> usize {
        self.lock().values().filter(|cell| cell.initialized()).count()
    }
}

/// Memoized values of one resource kind: individual items and listings.
pub struct ResourceCache<T> {
    items: Slots<T>,
    listings: Slots<Vec<T>>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            items: Slots::default(),
            listings: Slots::default(),
        }
    }
}

impl<T: Clone> ResourceCache<T> {
    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<T> {
        self.items.get(key)
    }

    /// Store a value. Returns `false` (and keeps the old value) if the key
    /// was already populated.
    pub fn put(&self, key: &str, value: T) -> bool {
        self.items.put(key, value)
    }

    /// Cached listing for `parent`, if one was stored.
    pub fn listing(&self, parent: &str) -> Option<Vec<T>> {
        self.listings.get(&listing_key(parent))
    }

    pub fn put_listing(&self, parent: &str, values: Vec<T>) -> bool {
        self.listings.put(&listing_key(parent), values)
    }

    /// Return the cached item or run `init` exactly once for this key.
    ///
    /// A failed `init` leaves the key empty so a later call may try again.
    pub async fn get_or_try_init<E, F, Fut>(&self, key: &str, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.items.get_or_try_init(key, init).await
    }

    /// Listing counterpart of [`ResourceCache::get_or_try_init`].
    pub async fn listing_or_try_init<E, F, Fut>(
        &self,
        parent: &str,
        init: F,
    ) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        self.listings.get_or_try_init(&listing_key(parent), init).await
    }

    /// Number of populated entries, items and listings together.
    pub fn len(&self) -> usize {
        self.items.len() + self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All caches of one client.
#[derive(Default)]
pub struct ClientCache {
    pub app_versions: ResourceCache<AppVersion>,
    pub task_groups: ResourceCache<TaskGroup>,
    pub work_order_types: ResourceCache<WorkOrderType>,
    /// Keyed by `"<work_order_id>/<task_group_id>"`; never empty.
    pub analyses: ResourceCache<Vec<Analysis>>,
}
