//! # Matchmaker Core
//!
//! Core library for the matchmaker profile service.
//!
//! This crate provides the data model and the matching logic, with no
//! I/O of its own:
//!
//! - [`Profile`] - a stored user profile (flat string field map)
//! - [`FieldSchema`] - the allowed field set, enforced at write time
//! - [`confidence`] - pairwise compatibility scoring
//! - [`suggestions_for`] - suggestion generation over a profile
//!   snapshot
//!
//! ## Example
//!
//! ```rust
//! use matchmaker_core::{suggestions_for, Profile};
//! use std::collections::BTreeMap;
//!
//! let mut profiles = BTreeMap::new();
//! profiles.insert(
//!     "alice".to_string(),
//!     Profile::from([("name", "Alice"), ("bio", "I love hiking")]),
//! );
//! profiles.insert(
//!     "bob".to_string(),
//!     Profile::from([("name", "Bob"), ("bio", "I love hiking")]),
//! );
//!
//! let suggestions = suggestions_for("alice", &profiles).unwrap();
//! assert_eq!(suggestions.len(), 1);
//! ```

pub mod error;
pub mod profile;
pub mod schema;
pub mod score;
pub mod suggest;

pub use error::{Error, Result};
pub use profile::Profile;
pub use schema::FieldSchema;
pub use score::{confidence, TEST_NAME_PREFIX};
pub use suggest::{suggestions_for, SUGGESTION_THRESHOLD};
