//! Product storage boundary.
//!
//! This module defines the storage-engine abstraction the service talks to, and
//! the concurrent in-memory engine used by the process.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use r#trait::{ProductStore, StoreError};
