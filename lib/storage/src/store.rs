//! Record store contract
//!
//! A record store is a durable mapping from string key to JSON value,
//! namespaced by collection. The service keeps profiles, the request
//! statistics and match state in separate collections of one store.

use std::collections::{BTreeMap, HashMap};

use matchmaker_core::Result;
use parking_lot::RwLock;
use serde_json::Value;

/// The collections the service persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Statistics,
    Matches,
}

impl Collection {
    /// Every collection, in the order they are initialized and reset.
    pub const ALL: [Collection; 3] = [
        Collection::Profiles,
        Collection::Statistics,
        Collection::Matches,
    ];

    /// Collection name as used for file names and logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Statistics => "statistics",
            Collection::Matches => "matches",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable key-value store, namespaced by [`Collection`].
///
/// Implementations must be safe to share across request handlers.
/// Reads return point-in-time snapshots; there is no transaction
/// spanning multiple calls.
pub trait RecordStore: Send + Sync {
    /// Snapshot of every record in a collection, keyed in ascending
    /// key order.
    fn get_all(&self, collection: Collection) -> Result<BTreeMap<String, Value>>;

    /// Fetch a single record, `None` if the key is absent.
    fn get_one(&self, collection: Collection, key: &str) -> Result<Option<Value>>;

    /// Insert or replace a record.
    fn set(&self, collection: Collection, key: &str, value: Value) -> Result<()>;

    /// Drop every record in a collection.
    fn reset(&self, collection: Collection) -> Result<()>;
}

/// In-memory record store with no durability. Used in tests and by
/// embedders that do not need persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get_all(&self, collection: Collection) -> Result<BTreeMap<String, Value>> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    fn get_one(&self, collection: Collection, key: &str) -> Result<Option<Value>> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn set(&self, collection: Collection, key: &str, value: Value) -> Result<()> {
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn reset(&self, collection: Collection) -> Result<()> {
        self.collections.write().remove(&collection);
        Ok(())
    }
}
