//! Backing object store for tessera datasets.
//!
//! A dataset is a namespace of named binary blobs. The write path stores
//! metadata objects and opaque page payloads under well-known string keys;
//! the read path fetches them back. The store itself knows nothing about
//! pages or clusters.

pub mod store;

pub use store::{FileStore, InstrumentedStore, MemStore, ObjectStore, StoreStats};
