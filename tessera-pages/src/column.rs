//! Typed append/read interface over pages for one column.
//!
//! A column owns the head page being written or the current page being
//! read, and drives the sink/source it is connected to. Element access is
//! generic over [`ColumnElement`], so the mappability check and codec
//! selection resolve at compile time.

use crate::element::ColumnElement;
use crate::model::{ColumnModel, ColumnType};
use crate::page::Page;
use crate::sink::PageSink;
use crate::source::PageSource;
use crate::types::{ColumnHandle, ElementIndex};
use std::sync::Arc;
use tessera_result::{Error, Result};
use tessera_store::ObjectStore;

pub struct Column<S: ObjectStore> {
    model: ColumnModel,
    sink: Option<(Arc<PageSink<S>>, ColumnHandle)>,
    source: Option<(Arc<PageSource<S>>, ColumnHandle)>,
    /// Open page into which new elements are being written.
    head_page: Option<Page<S::Blob>>,
    /// The currently mapped page for reading.
    current_page: Option<Page<S::Blob>>,
    /// Elements written resp. available in the column.
    n_elements: u64,
}

impl<S: ObjectStore> Column<S> {
    /// Connect a column for writing. The column must already be registered
    /// in the sink's header (it was part of the schema at create time).
    pub fn connect_sink(model: ColumnModel, sink: Arc<PageSink<S>>) -> Result<Self> {
        let handle = sink.column_handle(&model.name)?;
        let head_page = sink.reserve_page(handle, 0, 0);
        Ok(Self {
            model,
            sink: Some((sink, handle)),
            source: None,
            head_page: Some(head_page),
            current_page: None,
            n_elements: 0,
        })
    }

    /// Connect a column for reading; validates the model against the
    /// stored dataset.
    pub fn connect_source(model: ColumnModel, source: Arc<PageSource<S>>) -> Result<Self> {
        let handle = source.add_column(&model)?;
        let n_elements = source.n_elements(handle);
        Ok(Self {
            model,
            sink: None,
            source: Some((source, handle)),
            head_page: None,
            current_page: None,
            n_elements,
        })
    }

    pub fn model(&self) -> &ColumnModel {
        &self.model
    }

    pub fn n_elements(&self) -> u64 {
        self.n_elements
    }

    /// Append one element, flushing the head page first if it is full.
    pub fn append<E: ColumnElement>(&mut self, value: E) -> Result<()> {
        debug_assert_eq!(E::COLUMN_TYPE, self.model.column_type);
        if self.head_page.as_ref().map_or(true, |p| p.free_elements() == 0) {
            self.flush()?;
        }
        let page = self.head_page.as_mut().expect("flush reserves a head page");
        let dst = page.try_grow(1).expect("fresh head page has free capacity");
        value.write_to(dst);
        self.n_elements += 1;
        Ok(())
    }

    /// Append a batch. Prefers one contiguous write into the head page
    /// (flushing once if needed); a batch that does not fit even in a
    /// freshly flushed page degrades to per-element appends.
    pub fn append_slice<E: ColumnElement>(&mut self, values: &[E]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let count = values.len() as u64;
        if let Some(dst) = self.head_page.as_mut().and_then(|p| p.try_grow(count)) {
            write_batch(dst, values);
            self.n_elements += count;
            return Ok(());
        }
        self.flush()?;
        if let Some(dst) = self.head_page.as_mut().and_then(|p| p.try_grow(count)) {
            write_batch(dst, values);
            self.n_elements += count;
            return Ok(());
        }
        for value in values {
            self.append(*value)?;
        }
        Ok(())
    }

    /// Force a page commit and start a fresh head page, independent of
    /// capacity. Used at cluster boundaries. An empty head page commits
    /// nothing, which is what keeps a column absent from clusters it does
    /// not contribute to.
    pub fn flush(&mut self) -> Result<()> {
        let (sink, handle) = self
            .sink
            .clone()
            .ok_or_else(|| Error::Internal("column is not connected to a sink".into()))?;
        if let Some(page) = self.head_page.take() {
            if !page.is_empty() {
                sink.commit_page(handle, &page)?;
            }
            sink.release_page(page);
        }
        self.head_page = Some(sink.reserve_page(handle, 0, self.n_elements));
        Ok(())
    }

    /// Read one element, deserializing from the mapped page.
    pub fn read<E: ColumnElement>(&mut self, index: ElementIndex) -> Result<E> {
        debug_assert_eq!(E::COLUMN_TYPE, self.model.column_type);
        self.ensure_mapped(index)?;
        let page = self.current_page.as_ref().expect("page mapped");
        let offset = (index - page.range_first()) as usize * E::DISK_SIZE;
        Ok(E::read_from(&page.bytes()[offset..]))
    }

    /// Read a run of elements, continuing into subsequent pages when the
    /// run crosses a page boundary.
    pub fn read_slice<E: ColumnElement>(
        &mut self,
        index: ElementIndex,
        out: &mut [E],
    ) -> Result<()> {
        let mut next = index;
        let mut filled = 0usize;
        while filled < out.len() {
            self.ensure_mapped(next)?;
            let page = self.current_page.as_ref().expect("page mapped");
            let in_page = (next - page.range_first()) as usize;
            let avail = (page.n_elements() as usize - in_page).min(out.len() - filled);
            let bytes = page.bytes();
            for i in 0..avail {
                out[filled + i] = E::read_from(&bytes[(in_page + i) * E::DISK_SIZE..]);
            }
            filled += avail;
            next += avail as u64;
        }
        Ok(())
    }

    /// Zero-copy access to one element where the representation allows it;
    /// falls back to [`Column::read`] otherwise.
    pub fn map<E: ColumnElement>(&mut self, index: ElementIndex) -> Result<E> {
        if E::IS_MAPPABLE {
            if let Some(slice) = self.map_slice::<E>(index, 1)? {
                return Ok(slice[0]);
            }
        }
        self.read(index)
    }

    /// Zero-copy access to a run of elements. Returns `Ok(None)` when the
    /// type pair is not mappable, the run crosses a page boundary, or the
    /// payload bytes are not aligned for `E`; the caller falls back to
    /// [`Column::read_slice`].
    pub fn map_slice<E: ColumnElement>(
        &mut self,
        index: ElementIndex,
        count: u64,
    ) -> Result<Option<&[E]>> {
        if !E::IS_MAPPABLE || count == 0 {
            return Ok(None);
        }
        self.ensure_mapped(index)?;
        let page = self.current_page.as_ref().expect("page mapped");
        if index + count > page.range_end() {
            return Ok(None);
        }
        let offset = (index - page.range_first()) as usize * E::DISK_SIZE;
        let bytes = &page.bytes()[offset..offset + count as usize * E::DISK_SIZE];
        let ptr = bytes.as_ptr();
        if ptr as usize % std::mem::align_of::<E>() != 0 {
            return Ok(None);
        }
        // SAFETY: `E` is mappable, meaning its in-memory representation is
        // bit-identical to the on-disk bytes and every byte pattern is a
        // valid `E`; the pointer is aligned and the slice spans exactly
        // `count` elements inside the page's valid range.
        Ok(Some(unsafe {
            std::slice::from_raw_parts(ptr as *const E, count as usize)
        }))
    }

    /// For offset columns only: translate the cluster-local cumulative
    /// counts at `index` into the global pointee range of the `index`-th
    /// collection, as `(start, size)`.
    pub fn get_collection_info(&mut self, index: ElementIndex) -> Result<(ElementIndex, u64)> {
        debug_assert_eq!(self.model.column_type, ColumnType::Index);
        let mut idx_start = if index == 0 {
            0
        } else {
            self.map::<u64>(index - 1)?
        };
        let idx_end = self.map::<u64>(index)?;
        let page = self.current_page.as_ref().expect("offset page mapped");
        let info = page.cluster_info().expect("read pages carry cluster info");
        if index == info.self_offset {
            // Passed a cluster boundary; the cumulative counts restart.
            idx_start = 0;
        }
        // `pointee_offset` is INVALID_INDEX when the pointee contributed no
        // pages to this cluster; that only happens when every collection in
        // it is empty, so the start is never dereferenced.
        let start = info.pointee_offset.wrapping_add(idx_start);
        Ok((start, idx_end - idx_start))
    }

    fn ensure_mapped(&mut self, index: ElementIndex) -> Result<()> {
        if self.current_page.as_ref().is_some_and(|p| p.contains(index)) {
            return Ok(());
        }
        let (source, handle) = self
            .source
            .clone()
            .ok_or_else(|| Error::Internal("column is not connected to a source".into()))?;
        if let Some(old) = self.current_page.take() {
            source.release_page(&old);
        }
        self.current_page = Some(source.populate_page(handle, index)?);
        Ok(())
    }
}

impl<S: ObjectStore> Drop for Column<S> {
    fn drop(&mut self) {
        // Hand the mapped page back so the pool can evict it.
        if let (Some(page), Some((source, _))) = (self.current_page.take(), self.source.as_ref()) {
            source.release_page(&page);
        }
    }
}

fn write_batch<E: ColumnElement>(dst: &mut [u8], values: &[E]) {
    for (i, value) in values.iter().enumerate() {
        value.write_to(&mut dst[i * E::DISK_SIZE..]);
    }
}
