//! Pages: fixed-capacity buffers of serialized elements for one column.
//!
//! A page's backing bytes come from one of two places: plain heap memory on
//! the write path, or a blob owned by the backing store on the read path.
//! [`PageBuffer`] is the tagged release strategy for that split: dropping
//! the right variant releases the right resource, exactly once.

use crate::types::{ClusterId, ColumnId, ElementIndex};

/// Cluster bookkeeping attached to read-path pages; needed for the
/// cluster-local offset arithmetic of nested collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_id: ClusterId,
    /// First global element index of this page's column in this cluster.
    pub self_offset: ElementIndex,
    /// First global element index of the linked pointee column in this
    /// cluster, or [`crate::types::INVALID_INDEX`] if the pointee
    /// contributed no pages here.
    pub pointee_offset: ElementIndex,
}

/// Backing bytes of a page.
#[derive(Debug, Clone)]
pub enum PageBuffer<B> {
    /// Write path: heap memory allocated when the page was reserved.
    Heap(Vec<u8>),
    /// Read path: externally-owned bytes fetched from the object store.
    Blob(B),
}

/// A contiguous run of one column's elements held in one buffer.
///
/// Elements occupy the global index range `[range_first, range_first +
/// n_elements)`. A page never spans more than one cluster.
#[derive(Debug, Clone)]
pub struct Page<B> {
    column_id: ColumnId,
    buffer: PageBuffer<B>,
    element_size: usize,
    /// Count of valid elements currently in the page.
    n_elements: u64,
    /// Capacity in elements; equals `n_elements` for read-path pages.
    capacity: u64,
    range_first: ElementIndex,
    cluster_info: Option<ClusterInfo>,
}

impl<B: AsRef<[u8]>> Page<B> {
    /// Reserve a writable page with room for `capacity` elements, starting
    /// at global index `range_first`.
    pub fn new_heap(
        column_id: ColumnId,
        element_size: usize,
        capacity: u64,
        range_first: ElementIndex,
    ) -> Self {
        Self {
            column_id,
            buffer: PageBuffer::Heap(vec![0u8; element_size * capacity as usize]),
            element_size,
            n_elements: 0,
            capacity,
            range_first,
            cluster_info: None,
        }
    }

    /// Wrap a store-owned payload blob as a fully-populated read page.
    pub fn wrap_blob(
        column_id: ColumnId,
        blob: B,
        element_size: usize,
        n_elements: u64,
        range_first: ElementIndex,
        cluster_info: ClusterInfo,
    ) -> Self {
        debug_assert_eq!(blob.as_ref().len(), element_size * n_elements as usize);
        Self {
            column_id,
            buffer: PageBuffer::Blob(blob),
            element_size,
            n_elements,
            capacity: n_elements,
            range_first,
            cluster_info: Some(cluster_info),
        }
    }

    pub fn column_id(&self) -> ColumnId {
        self.column_id
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn n_elements(&self) -> u64 {
        self.n_elements
    }

    pub fn is_empty(&self) -> bool {
        self.n_elements == 0
    }

    pub fn free_elements(&self) -> u64 {
        self.capacity - self.n_elements
    }

    pub fn range_first(&self) -> ElementIndex {
        self.range_first
    }

    /// Global index one past the last valid element.
    pub fn range_end(&self) -> ElementIndex {
        self.range_first + self.n_elements
    }

    pub fn contains(&self, index: ElementIndex) -> bool {
        index >= self.range_first && index < self.range_end()
    }

    pub fn cluster_info(&self) -> Option<&ClusterInfo> {
        self.cluster_info.as_ref()
    }

    /// Valid serialized bytes of the page.
    pub fn bytes(&self) -> &[u8] {
        let len = self.element_size * self.n_elements as usize;
        match &self.buffer {
            PageBuffer::Heap(v) => &v[..len],
            PageBuffer::Blob(b) => &b.as_ref()[..len],
        }
    }

    /// Try to claim space for `n` more elements. Returns the destination
    /// byte slice on success, or `None` if the free capacity is
    /// insufficient. Read-path pages are always full and never grow.
    pub fn try_grow(&mut self, n: u64) -> Option<&mut [u8]> {
        if n == 0 || n > self.free_elements() {
            return None;
        }
        let start = self.element_size * self.n_elements as usize;
        let end = start + self.element_size * n as usize;
        self.n_elements += n;
        match &mut self.buffer {
            PageBuffer::Heap(v) => Some(&mut v[start..end]),
            // Blob pages have capacity == n_elements, so this arm is
            // unreachable through the free-capacity check above.
            PageBuffer::Blob(_) => None,
        }
    }
}
