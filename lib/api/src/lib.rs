//! # Matchmaker API
//!
//! REST API for the matchmaker profile service: routing, shared-secret
//! authentication and the request hit counter, over a
//! [`StoreManager`](matchmaker_storage::StoreManager).

pub mod auth;
pub mod rest;

pub use auth::{AuthConfig, SHARED_SECRET_HEADER};
pub use rest::{RestApi, IGNORE_HIT_HEADER};
