use super::ObjectStore;
use bytes::Bytes;
use rustc_hash::FxHashMap;
use std::sync::RwLock;
use tessera_result::{Error, Result};

/// In-memory object store used for tests and benchmarks.
#[derive(Default)]
pub struct MemStore {
    blobs: RwLock<FxHashMap<String, Bytes>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(FxHashMap::default()),
        }
    }
}

impl ObjectStore for MemStore {
    type Blob = Bytes;

    fn put_object(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut map = self
            .blobs
            .write()
            .expect("MemStore blobs write lock poisoned");
        map.insert(key.to_string(), Bytes::copy_from_slice(bytes));
        Ok(())
    }

    fn get_object(&self, key: &str) -> Result<Self::Blob> {
        let map = self
            .blobs
            .read()
            .expect("MemStore blobs read lock poisoned");
        map.get(key).cloned().ok_or(Error::NotFound)
    }

    fn has_object(&self, key: &str) -> bool {
        let map = self
            .blobs
            .read()
            .expect("MemStore blobs read lock poisoned");
        map.contains_key(key)
    }
}
