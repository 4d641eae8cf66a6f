//! Write path: serializes pages and metadata into the backing store.
//!
//! Every commit is an immediate synchronous write; the only state carried
//! across commits is the current cluster's per-column range-start lists.

use crate::constants::DEFAULT_ELEMENTS_PER_PAGE;
use crate::meta::{
    self, ClusterFooter, Footer, Header, KEY_FOOTER, KEY_HEADER, PageList, cluster_footer_key,
    dataset_key, page_payload_key,
};
use crate::model::Schema;
use crate::page::Page;
use crate::types::{ColumnHandle, ColumnId, ElementIndex};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};
use tessera_result::{Error, Result};
use tessera_store::ObjectStore;

struct SinkState {
    header: Header,
    footer: Footer,
    current_cluster: ClusterFooter,
    prev_cluster_entries: u64,
    name_to_id: FxHashMap<String, ColumnId>,
}

/// The write engine for one dataset. Shared by its columns via `Arc`; the
/// mutable bookkeeping sits behind a lock, but the model remains
/// single-writer: one logical thread drives all appends and commits.
pub struct PageSink<S: ObjectStore> {
    name: String,
    store: Arc<S>,
    state: RwLock<SinkState>,
}

impl<S: ObjectStore> PageSink<S> {
    /// Create a dataset: register every column of `schema` with a dense id
    /// in schema order and write the header immediately.
    pub fn create(name: impl Into<String>, store: Arc<S>, schema: &Schema) -> Result<Self> {
        let name = name.into();
        let mut header = Header::default();
        let mut name_to_id = FxHashMap::default();

        for schema_field in &schema.fields {
            header.fields.push(schema_field.field.clone());
            // The field's column-connection contributes one or more
            // concrete columns, each registered once.
            for column in &schema_field.columns {
                let id = header.columns.len() as ColumnId;
                name_to_id.insert(column.name.clone(), id);
                header.columns.push(column.clone());
            }
        }
        assert_eq!(
            schema.n_columns(),
            header.columns.len(),
            "schema declares a different column count than it connected"
        );

        let n_columns = header.columns.len();
        let footer = Footer {
            n_clusters: 0,
            n_entries: 0,
            n_elements_per_column: vec![0; n_columns],
        };
        let current_cluster = ClusterFooter {
            n_entries: 0,
            entry_range_start: 0,
            pages_per_column: vec![PageList::default(); n_columns],
        };

        store.put_object(&dataset_key(&name, KEY_HEADER), &meta::encode(&header))?;
        tracing::debug!(dataset = %name, columns = n_columns, "created dataset header");

        Ok(Self {
            name,
            store,
            state: RwLock::new(SinkState {
                header,
                footer,
                current_cluster,
                prev_cluster_entries: 0,
                name_to_id,
            }),
        })
    }

    pub fn dataset_name(&self) -> &str {
        &self.name
    }

    /// Resolve a registered column's handle by name.
    pub fn column_handle(&self, name: &str) -> Result<ColumnHandle> {
        let state = self.state.read().expect("PageSink state lock poisoned");
        state
            .name_to_id
            .get(name)
            .map(|id| ColumnHandle::new(*id))
            .ok_or(Error::NotFound)
    }

    /// Allocate a fresh head page for `handle`, sized for `n_elements`
    /// (default page size if zero), covering global indices starting at
    /// `range_first`.
    pub fn reserve_page(
        &self,
        handle: ColumnHandle,
        n_elements: u64,
        range_first: ElementIndex,
    ) -> Page<S::Blob> {
        let capacity = if n_elements == 0 {
            DEFAULT_ELEMENTS_PER_PAGE
        } else {
            n_elements
        };
        let state = self.state.read().expect("PageSink state lock poisoned");
        let element_size = state.header.columns[handle.id as usize].element_size();
        Page::new_heap(handle.id, element_size, capacity, range_first)
    }

    /// Serialize the page's valid bytes under its
    /// (cluster, column, page-ordinal) key and record its range start in
    /// the current cluster.
    pub fn commit_page(&self, handle: ColumnHandle, page: &Page<S::Blob>) -> Result<()> {
        let mut state = self.state.write().expect("PageSink state lock poisoned");
        let column_id = handle.id;
        let cluster_id = state.footer.n_clusters;
        let page_in_cluster =
            state.current_cluster.pages_per_column[column_id as usize].range_starts.len() as u64;
        let key = dataset_key(
            &self.name,
            &page_payload_key(cluster_id, column_id, page_in_cluster),
        );
        self.store.put_object(&key, page.bytes())?;
        state.current_cluster.pages_per_column[column_id as usize]
            .range_starts
            .push(page.range_first());
        state.footer.n_elements_per_column[column_id as usize] += page.n_elements();
        Ok(())
    }

    /// Seal the current cluster: write its footer and reset the per-column
    /// range-start lists. `total_entries` is the cumulative dataset entry
    /// count; the cluster's own entry count is the delta from the previous
    /// commit.
    pub fn commit_cluster(&self, total_entries: u64) -> Result<()> {
        let mut state = self.state.write().expect("PageSink state lock poisoned");
        state.current_cluster.n_entries = total_entries - state.prev_cluster_entries;
        state.prev_cluster_entries = total_entries;

        let cluster_id = state.footer.n_clusters;
        let key = dataset_key(&self.name, &cluster_footer_key(cluster_id));
        self.store
            .put_object(&key, &meta::encode(&state.current_cluster))?;

        state.footer.n_clusters += 1;
        state.footer.n_entries = total_entries;
        for pages in &mut state.current_cluster.pages_per_column {
            pages.range_starts.clear();
        }
        state.current_cluster.entry_range_start = total_entries;
        tracing::debug!(
            dataset = %self.name,
            cluster = cluster_id,
            entries = state.current_cluster.n_entries,
            "committed cluster"
        );
        Ok(())
    }

    /// Write the dataset footer. Idempotent when no writes intervene: the
    /// footer bytes are a pure function of the committed state.
    pub fn commit_dataset(&self) -> Result<()> {
        let state = self.state.read().expect("PageSink state lock poisoned");
        self.store
            .put_object(&dataset_key(&self.name, KEY_FOOTER), &meta::encode(&state.footer))?;
        tracing::debug!(
            dataset = %self.name,
            clusters = state.footer.n_clusters,
            entries = state.footer.n_entries,
            "committed dataset footer"
        );
        Ok(())
    }

    /// Return a committed head page for destruction. Dropping the page
    /// frees its heap buffer.
    pub fn release_page(&self, page: Page<S::Blob>) {
        drop(page);
    }
}
