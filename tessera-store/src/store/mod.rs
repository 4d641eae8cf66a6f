//! Minimal object-store trait + implementations returning `bytes::Bytes`
//! blobs.
//!
//! Returning `Bytes` lets readers keep pages mapped over the store's memory
//! with cheap clones and no re-copying on cache hits.

pub mod file_store;
pub use file_store::*;

pub mod mem_store;
pub use mem_store::*;

pub mod instrumented_store;
pub use instrumented_store::*;

use tessera_result::Result;

/// A named-blob key/value container holding one dataset's objects.
///
/// Keys are flat strings; a `/` separates a dataset scope from the object
/// name within it. Writes are assumed create-once by the on-disk format:
/// overwriting an existing key is permitted but only ever done with
/// identical contents (the final footer is the one object written twice in
/// practice).
pub trait ObjectStore: Send + Sync + 'static {
    type Blob: AsRef<[u8]> + Clone + Send + Sync + 'static;

    /// Serialize an object under `key`.
    fn put_object(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Locate a previously written object. `Error::NotFound` if absent.
    fn get_object(&self, key: &str) -> Result<Self::Blob>;

    /// Whether `key` currently names an object.
    fn has_object(&self, key: &str) -> bool;
}
