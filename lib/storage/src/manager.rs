//! Typed facade over the record store
//!
//! Handlers talk to [`StoreManager`] rather than to raw collections:
//! it knows which collection each kind of record lives in and converts
//! between JSON records and core types.

use std::collections::BTreeMap;
use std::path::Path;

use matchmaker_core::{Error, Profile, Result};
use serde_json::Value;

use crate::json_store::JsonFileStore;
use crate::store::{Collection, MemoryStore, RecordStore};

/// Key the request counter is stored under in the statistics collection.
const HITS_KEY: &str = "hits";

/// Owns the record store and exposes typed accessors per collection.
pub struct StoreManager {
    store: Box<dyn RecordStore>,
}

impl StoreManager {
    /// Open a file-backed store rooted at `data_dir`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Ok(Self {
            store: Box::new(JsonFileStore::new(data_dir)?),
        })
    }

    /// Store that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
        }
    }

    /// Wrap a caller-supplied record store implementation.
    #[must_use]
    pub fn with_store(store: Box<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Snapshot of every stored profile, keyed by id in ascending id
    /// order. This is the snapshot the suggestion engine scans.
    pub fn profiles(&self) -> Result<BTreeMap<String, Profile>> {
        let records = self.store.get_all(Collection::Profiles)?;
        let mut profiles = BTreeMap::new();
        for (id, value) in records {
            profiles.insert(id, Profile::from_value(&value)?);
        }
        Ok(profiles)
    }

    /// Number of stored profiles.
    pub fn profile_count(&self) -> Result<usize> {
        Ok(self.store.get_all(Collection::Profiles)?.len())
    }

    /// Fetch one profile by id.
    pub fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        match self.store.get_one(Collection::Profiles, id)? {
            Some(value) => Ok(Some(Profile::from_value(&value)?)),
            None => Ok(None),
        }
    }

    /// Create a profile. Fails with [`Error::ProfileExists`] if the id
    /// is already taken; existing profiles are never overwritten this
    /// way.
    pub fn create_profile(&self, id: &str, profile: &Profile) -> Result<()> {
        if self.store.get_one(Collection::Profiles, id)?.is_some() {
            return Err(Error::ProfileExists(id.to_string()));
        }
        self.store.set(Collection::Profiles, id, profile.to_value())
    }

    /// Merge `patch` into an existing profile and persist the result.
    /// The patch must already be schema-validated.
    pub fn patch_profile(&self, id: &str, patch: &Profile) -> Result<Profile> {
        let mut profile = self
            .get_profile(id)?
            .ok_or_else(|| Error::ProfileNotFound(id.to_string()))?;
        profile.apply(patch);
        self.store.set(Collection::Profiles, id, profile.to_value())?;
        Ok(profile)
    }

    /// Current request count.
    pub fn hits(&self) -> Result<u64> {
        Ok(self
            .store
            .get_one(Collection::Statistics, HITS_KEY)?
            .and_then(|value| value.as_u64())
            .unwrap_or(0))
    }

    /// Bump the request counter by one, returning the new count.
    pub fn increment_hits(&self) -> Result<u64> {
        let hits = self.hits()? + 1;
        self.store
            .set(Collection::Statistics, HITS_KEY, Value::from(hits))?;
        Ok(hits)
    }

    /// Clear every collection.
    pub fn reset_all(&self) -> Result<()> {
        for collection in Collection::ALL {
            self.store.reset(collection)?;
        }
        Ok(())
    }
}
