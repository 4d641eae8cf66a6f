use super::ObjectStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tessera_result::Result;

/// A thread-safe container for physical I/O statistics.
#[derive(Debug, Default)]
pub struct StoreStats {
    pub physical_gets: AtomicU64,
    pub physical_puts: AtomicU64,
    pub missing_gets: AtomicU64,
    pub put_bytes: AtomicU64,
}

impl StoreStats {
    pub fn gets(&self) -> u64 {
        self.physical_gets.load(Ordering::Relaxed)
    }

    pub fn puts(&self) -> u64 {
        self.physical_puts.load(Ordering::Relaxed)
    }
}

/// Wraps any [`ObjectStore`] and counts physical operations.
///
/// Used by tests that pin down I/O behavior, e.g. that a page-pool hit does
/// not issue a second fetch for the same page.
pub struct InstrumentedStore<S: ObjectStore> {
    inner: S,
    stats: Arc<StoreStats>,
}

impl<S: ObjectStore> InstrumentedStore<S> {
    pub fn new(inner: S) -> (Self, Arc<StoreStats>) {
        let stats = Arc::new(StoreStats::default());
        (
            Self {
                inner,
                stats: Arc::clone(&stats),
            },
            stats,
        )
    }
}

impl<S: ObjectStore> ObjectStore for InstrumentedStore<S> {
    type Blob = S::Blob;

    fn put_object(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.stats.physical_puts.fetch_add(1, Ordering::Relaxed);
        self.stats
            .put_bytes
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);
        self.inner.put_object(key, bytes)
    }

    fn get_object(&self, key: &str) -> Result<Self::Blob> {
        self.stats.physical_gets.fetch_add(1, Ordering::Relaxed);
        let res = self.inner.get_object(key);
        if res.is_err() {
            self.stats.missing_gets.fetch_add(1, Ordering::Relaxed);
        }
        res
    }

    fn has_object(&self, key: &str) -> bool {
        self.inner.has_object(key)
    }
}
