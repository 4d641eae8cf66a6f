//! Cache of currently-mapped read pages.
//!
//! Entries are reference-counted: `get_page`/`register_page` take a
//! reference, `return_page` drops one, and an entry whose count reaches
//! zero is evicted. Eviction drops the page, and with it the
//! [`crate::page::PageBuffer`] variant holding the store-owned blob, so
//! the release runs exactly once and there is no separate deleter to call.

use crate::page::Page;
use crate::types::{ColumnId, ElementIndex};
use std::sync::RwLock;

struct PoolEntry<B> {
    page: Page<B>,
    refs: usize,
}

/// Pool of mapped pages, keyed by (column id, covered element range).
pub struct PagePool<B> {
    entries: RwLock<Vec<PoolEntry<B>>>,
}

impl<B> Default for PagePool<B> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<B: AsRef<[u8]> + Clone> PagePool<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a mapped page covering `(column_id, index)`. On a hit the
    /// entry gains a reference and a clone of the page is returned; the
    /// clone shares the underlying blob.
    pub fn get_page(&self, column_id: ColumnId, index: ElementIndex) -> Option<Page<B>> {
        let mut entries = self
            .entries
            .write()
            .expect("PagePool entries lock poisoned");
        for entry in entries.iter_mut() {
            if entry.page.column_id() == column_id && entry.page.contains(index) {
                entry.refs += 1;
                return Some(entry.page.clone());
            }
        }
        None
    }

    /// Register a freshly-populated page with one reference held by the
    /// caller.
    pub fn register_page(&self, page: Page<B>) {
        let mut entries = self
            .entries
            .write()
            .expect("PagePool entries lock poisoned");
        entries.push(PoolEntry { page, refs: 1 });
    }

    /// Return a reference on the entry matching `page`. The last return
    /// evicts the entry and frees the blob.
    pub fn return_page(&self, page: &Page<B>) {
        let mut entries = self
            .entries
            .write()
            .expect("PagePool entries lock poisoned");
        if let Some(pos) = entries.iter().position(|e| {
            e.page.column_id() == page.column_id() && e.page.range_first() == page.range_first()
        }) {
            entries[pos].refs -= 1;
            if entries[pos].refs == 0 {
                entries.swap_remove(pos);
            }
        }
    }

    /// Number of currently-registered pages.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("PagePool entries lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
