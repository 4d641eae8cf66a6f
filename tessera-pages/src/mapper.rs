//! The in-memory index built at attach time.
//!
//! One pass over header + footer + per-cluster footers produces, per
//! column, parallel arrays indexed by page-within-column. All lookups after
//! attach are integer arithmetic and binary search over these arrays; the
//! mapper is never mutated again.

use crate::meta::{ClusterFooter, Footer, Header};
use crate::model::{ColumnModel, FieldModel};
use crate::types::{ClusterId, ColumnId, ElementIndex, INVALID_INDEX};
use rustc_hash::FxHashMap;

/// Resolution of an element index to its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlot {
    /// Position in the column's parallel page arrays.
    pub page_idx: usize,
    /// Global element index of the page's first element.
    pub first_in_page: ElementIndex,
    /// Exclusive upper bound of the page's element range.
    pub first_outside_page: ElementIndex,
}

/// Per-column page arrays, parallel and indexed by page-within-column.
#[derive(Debug, Clone, Default)]
pub struct ColumnPageIndex {
    pub range_starts: Vec<ElementIndex>,
    pub cluster_ids: Vec<ClusterId>,
    pub page_in_cluster: Vec<u64>,
    /// First global element index of this column in the page's cluster.
    pub self_cluster_offsets: Vec<ElementIndex>,
    /// First global element index of the linked pointee column in the
    /// page's cluster, or `INVALID_INDEX` if none.
    pub pointee_cluster_offsets: Vec<ElementIndex>,
    /// Total element count of the column, from the dataset footer.
    pub n_elements: u64,
}

impl ColumnPageIndex {
    /// Binary-search the sorted range-start array for the page covering
    /// `index`.
    ///
    /// The exclusive upper bound of a candidate page is the next entry's
    /// range-start, or the column total for the last page; bounds are
    /// tracked explicitly because clusters may contribute zero pages for a
    /// column, so positions in these arrays do not map 1:1 to clusters.
    pub fn find_page(&self, index: ElementIndex) -> PageSlot {
        let n_elems = self.n_elements;
        assert!(
            index < n_elems,
            "element index {index} out of range (column has {n_elems})"
        );
        let starts = &self.range_starts;
        debug_assert!(!starts.is_empty());
        let i_last = starts.len() - 1;
        let mut lower = 0usize;
        let mut upper = i_last;
        loop {
            let pivot_idx = (lower + upper) / 2;
            let pivot = starts[pivot_idx];
            if pivot > index {
                upper = pivot_idx - 1;
                continue;
            }
            let next = if pivot_idx < i_last {
                starts[pivot_idx + 1]
            } else {
                n_elems
            };
            if pivot == index || next > index {
                return PageSlot {
                    page_idx: pivot_idx,
                    first_in_page: pivot,
                    first_outside_page: next,
                };
            }
            lower = pivot_idx + 1;
        }
    }
}

/// Read-only index over a stored dataset, built once by
/// [`crate::source::PageSource::attach`].
#[derive(Debug, Default)]
pub struct Mapper {
    column_name_to_id: FxHashMap<String, ColumnId>,
    models: Vec<ColumnModel>,
    /// offset column id -> pointee column id.
    column_to_pointee: FxHashMap<ColumnId, ColumnId>,
    column_index: Vec<ColumnPageIndex>,
    root_fields: Vec<FieldModel>,
    n_entries: u64,
}

impl Mapper {
    /// Seed the mapper from the immutable header: dense ids in header
    /// order, offset→pointee links resolved to ids once.
    pub(crate) fn from_header(header: &Header) -> Self {
        let mut mapper = Mapper::default();
        for field in &header.fields {
            if field.parent.is_none() {
                mapper.root_fields.push(field.clone());
            }
        }
        for (id, column) in header.columns.iter().enumerate() {
            mapper
                .column_name_to_id
                .insert(column.name.clone(), id as ColumnId);
            mapper.models.push(column.clone());
            mapper.column_index.push(ColumnPageIndex::default());
        }
        for column in &header.columns {
            if let Some(offset_name) = &column.offset_column {
                let offset_id = mapper.column_name_to_id[offset_name];
                let pointee_id = mapper.column_name_to_id[&column.name];
                mapper.column_to_pointee.insert(offset_id, pointee_id);
            }
        }
        mapper
    }

    /// Fold one cluster footer into the per-column page arrays.
    pub(crate) fn ingest_cluster(&mut self, cluster_id: ClusterId, footer: &ClusterFooter) {
        let n_columns = self.models.len();
        assert_eq!(
            footer.pages_per_column.len(),
            n_columns,
            "cluster {cluster_id} footer lists {} columns, header has {n_columns}",
            footer.pages_per_column.len()
        );
        for column_id in 0..n_columns {
            let pages = &footer.pages_per_column[column_id];
            if pages.range_starts.is_empty() {
                continue;
            }
            let self_offset = pages.range_starts[0];
            // The pointee might not have any pages in this cluster
            // (e.g. all-empty collections).
            let pointee_offset = self
                .column_to_pointee
                .get(&(column_id as ColumnId))
                .map(|pointee| &footer.pages_per_column[*pointee as usize].range_starts)
                .and_then(|starts| starts.first().copied())
                .unwrap_or(INVALID_INDEX);

            let index = &mut self.column_index[column_id];
            for (page_in_cluster, range_start) in pages.range_starts.iter().enumerate() {
                index.range_starts.push(*range_start);
                index.cluster_ids.push(cluster_id);
                index.page_in_cluster.push(page_in_cluster as u64);
                index.self_cluster_offsets.push(self_offset);
                index.pointee_cluster_offsets.push(pointee_offset);
            }
        }
    }

    /// Copy authoritative totals from the dataset footer.
    pub(crate) fn set_totals(&mut self, footer: &Footer) {
        for (column_id, n_elements) in footer.n_elements_per_column.iter().enumerate() {
            self.column_index[column_id].n_elements = *n_elements;
        }
        self.n_entries = footer.n_entries;
    }

    pub fn column_id(&self, name: &str) -> Option<ColumnId> {
        self.column_name_to_id.get(name).copied()
    }

    pub fn model(&self, column_id: ColumnId) -> &ColumnModel {
        &self.models[column_id as usize]
    }

    pub fn column_index(&self, column_id: ColumnId) -> &ColumnPageIndex {
        &self.column_index[column_id as usize]
    }

    pub fn n_columns(&self) -> usize {
        self.models.len()
    }

    pub fn n_entries(&self) -> u64 {
        self.n_entries
    }

    pub fn root_fields(&self) -> &[FieldModel] {
        &self.root_fields
    }
}
