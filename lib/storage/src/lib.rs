//! # Matchmaker Storage
//!
//! Persistence layer for the matchmaker profile service: the
//! [`RecordStore`] contract, a flat-file JSON implementation
//! ([`JsonFileStore`]), an in-memory implementation ([`MemoryStore`])
//! and the typed [`StoreManager`] facade the API layer talks to.

pub mod json_store;
pub mod manager;
pub mod store;

pub use json_store::JsonFileStore;
pub use manager::StoreManager;
pub use store::{Collection, MemoryStore, RecordStore};
