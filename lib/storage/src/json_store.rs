//! Flat-file JSON persistence
//!
//! Each collection lives in its own `<name>.json` file under the data
//! directory, holding a single JSON object from record key to record
//! value. Collections are loaded once at startup and the whole file is
//! rewritten atomically on every mutation; the data volumes this
//! service handles make that the simplest durable option.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use atomicwrites::{AtomicFile, OverwriteBehavior};
use matchmaker_core::{Error, Result};
use parking_lot::RwLock;
use serde_json::Value;

use crate::store::{Collection, RecordStore};

/// Durable record store backed by one JSON file per collection.
pub struct JsonFileStore {
    data_dir: PathBuf,
    collections: RwLock<HashMap<Collection, BTreeMap<String, Value>>>,
}

impl JsonFileStore {
    /// Open the store rooted at `data_dir`, creating the directory and
    /// loading any existing collection files. A missing or empty file
    /// loads as an empty collection.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let mut collections = HashMap::new();
        for collection in Collection::ALL {
            collections.insert(collection, load_collection(&data_dir, collection)?);
        }

        Ok(Self {
            data_dir,
            collections: RwLock::new(collections),
        })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_path(&self, collection: Collection) -> PathBuf {
        collection_path(&self.data_dir, collection)
    }

    /// Write a collection's records to its file, replacing it
    /// atomically so a crash mid-write never leaves a torn file.
    fn persist(&self, collection: Collection, records: &BTreeMap<String, Value>) -> Result<()> {
        let data = serde_json::to_vec_pretty(records)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let file = AtomicFile::new(self.file_path(collection), OverwriteBehavior::AllowOverwrite);
        file.write(|f| f.write_all(&data))
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
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
        // hold the write lock across the file write so concurrent
        // mutations serialize and the file always matches memory
        let mut collections = self.collections.write();
        let records = collections.entry(collection).or_default();
        records.insert(key.to_string(), value);
        self.persist(collection, records)
    }

    fn reset(&self, collection: Collection) -> Result<()> {
        let mut collections = self.collections.write();
        let records = collections.entry(collection).or_default();
        records.clear();
        self.persist(collection, records)
    }
}

fn collection_path(data_dir: &Path, collection: Collection) -> PathBuf {
    data_dir.join(format!("{}.json", collection.as_str()))
}

fn load_collection(data_dir: &Path, collection: Collection) -> Result<BTreeMap<String, Value>> {
    let path = collection_path(data_dir, collection);
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let data = std::fs::read(&path)?;
    if data.is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_slice(&data).map_err(|e| {
        Error::Serialization(format!("{} collection is unreadable: {}", collection, e))
    })
}
