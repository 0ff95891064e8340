//! # Matchmaker
//!
//! A small profile matchmaking service over flat JSON files.
//!
//! Profiles are stored in a file-backed record store, every request is
//! counted toward a hit statistic, protected routes are gated by a
//! shared secret, and match suggestions come from a naive pairwise
//! compatibility score.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! SHARED_SECRET=hunter2 matchmaker --data-dir ./database --port 3000
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use matchmaker::prelude::*;
//!
//! let store = StoreManager::in_memory();
//! let alice = Profile::from([("name", "Alice"), ("bio", "I love hiking")]);
//! let bob = Profile::from([("name", "Bob"), ("bio", "I love hiking")]);
//! store.create_profile("alice", &alice).unwrap();
//! store.create_profile("bob", &bob).unwrap();
//!
//! let profiles = store.profiles().unwrap();
//! let suggestions = suggestions_for("alice", &profiles).unwrap();
//! assert_eq!(suggestions, vec![bob]);
//! ```
//!
//! ## Crate Structure
//!
//! - `matchmaker-core` - profile model, field schema, compatibility
//!   scorer and suggestion engine
//! - `matchmaker-storage` - the record store contract and its
//!   flat-file JSON and in-memory implementations
//! - `matchmaker-api` - actix-web REST layer with shared-secret auth
//!   and hit counting

// Re-export core types
pub use matchmaker_core::{
    confidence, suggestions_for, Error, FieldSchema, Profile, Result, SUGGESTION_THRESHOLD,
    TEST_NAME_PREFIX,
};

// Re-export storage
pub use matchmaker_storage::{Collection, JsonFileStore, MemoryStore, RecordStore, StoreManager};

// Re-export API
pub use matchmaker_api::{AuthConfig, RestApi, IGNORE_HIT_HEADER, SHARED_SECRET_HEADER};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        confidence, suggestions_for, AuthConfig, Collection, Error, FieldSchema, JsonFileStore,
        MemoryStore, Profile, RecordStore, RestApi, Result, StoreManager, SUGGESTION_THRESHOLD,
    };
}
