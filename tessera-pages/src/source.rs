//! Read path: reconstructs an addressable column store from on-disk
//! metadata.
//!
//! `attach` makes one pass over header, footer and cluster footers to build
//! the [`Mapper`]; after that, reads are pool lookups plus binary search,
//! and only page-payload fetches touch the store.

use crate::mapper::Mapper;
use crate::meta::{
    self, ClusterFooter, Footer, Header, KEY_FOOTER, KEY_HEADER, cluster_footer_key, dataset_key,
    page_payload_key,
};
use crate::model::{ColumnModel, Schema, SchemaField};
use crate::page::{ClusterInfo, Page};
use crate::pool::PagePool;
use crate::types::{ColumnHandle, ElementIndex};
use std::sync::Arc;
use tessera_result::Result;
use tessera_store::ObjectStore;

/// The read engine for one dataset. The mapper is immutable after
/// `attach`; the page pool is the only mutable state, so a source can be
/// shared via `Arc` by the columns reading through it.
pub struct PageSource<S: ObjectStore> {
    name: String,
    store: Arc<S>,
    mapper: Mapper,
    pool: PagePool<S::Blob>,
}

impl<S: ObjectStore> PageSource<S> {
    /// Open the named dataset and build the mapper from its metadata.
    /// Fails with `NotFound` if the dataset or any expected metadata key
    /// is absent.
    pub fn attach(name: impl Into<String>, store: Arc<S>) -> Result<Self> {
        let name = name.into();

        let header_blob = store.get_object(&dataset_key(&name, KEY_HEADER))?;
        let header: Header = meta::decode(header_blob.as_ref(), "dataset header")?;
        let mut mapper = Mapper::from_header(&header);

        let footer_blob = store.get_object(&dataset_key(&name, KEY_FOOTER))?;
        let footer: Footer = meta::decode(footer_blob.as_ref(), "dataset footer")?;

        for cluster_id in 0..footer.n_clusters {
            let key = dataset_key(&name, &cluster_footer_key(cluster_id));
            let blob = store.get_object(&key)?;
            let cluster_footer: ClusterFooter = meta::decode(blob.as_ref(), "cluster footer")?;
            mapper.ingest_cluster(cluster_id, &cluster_footer);
        }
        mapper.set_totals(&footer);

        tracing::debug!(
            dataset = %name,
            clusters = footer.n_clusters,
            entries = footer.n_entries,
            columns = mapper.n_columns(),
            "attached dataset"
        );

        Ok(Self {
            name,
            store,
            mapper,
            pool: PagePool::new(),
        })
    }

    pub fn dataset_name(&self) -> &str {
        &self.name
    }

    /// Resolve a runtime column against the stored dataset. The runtime
    /// model must match the stored model exactly; a mismatch means the
    /// dataset is incompatible with the caller's schema and is fatal.
    pub fn add_column(&self, model: &ColumnModel) -> Result<ColumnHandle> {
        let id = self
            .mapper
            .column_id(&model.name)
            .ok_or(tessera_result::Error::NotFound)?;
        let stored = self.mapper.model(id);
        assert!(
            model.matches(stored),
            "column model mismatch for '{}': runtime {model:?} vs stored {stored:?}",
            model.name
        );
        Ok(ColumnHandle::new(id))
    }

    /// Map the page covering `(column, index)`, fetching it from the store
    /// only on a pool miss.
    pub fn populate_page(
        &self,
        handle: ColumnHandle,
        index: ElementIndex,
    ) -> Result<Page<S::Blob>> {
        let column_id = handle.id;
        if let Some(page) = self.pool.get_page(column_id, index) {
            return Ok(page);
        }

        let column_index = self.mapper.column_index(column_id);
        let slot = column_index.find_page(index);
        let elems_in_page = slot.first_outside_page - slot.first_in_page;
        let page_idx = slot.page_idx;
        let cluster_id = column_index.cluster_ids[page_idx];
        let page_in_cluster = column_index.page_in_cluster[page_idx];
        let cluster_info = ClusterInfo {
            cluster_id,
            self_offset: column_index.self_cluster_offsets[page_idx],
            pointee_offset: column_index.pointee_cluster_offsets[page_idx],
        };

        let key = dataset_key(
            &self.name,
            &page_payload_key(cluster_id, column_id, page_in_cluster),
        );
        let blob = self.store.get_object(&key)?;
        let payload_len = blob.as_ref().len() as u64;
        assert_eq!(
            payload_len % elems_in_page,
            0,
            "page payload of {payload_len} bytes does not divide into {elems_in_page} elements"
        );
        let element_size = (payload_len / elems_in_page) as usize;

        tracing::trace!(
            dataset = %self.name,
            column = column_id,
            cluster = cluster_id,
            page = page_in_cluster,
            first = slot.first_in_page,
            "populated page"
        );

        let page = Page::wrap_blob(
            column_id,
            blob,
            element_size,
            elems_in_page,
            slot.first_in_page,
            cluster_info,
        );
        self.pool.register_page(page.clone());
        Ok(page)
    }

    /// Hand a mapped page back to the pool.
    pub fn release_page(&self, page: &Page<S::Blob>) {
        self.pool.return_page(page);
    }

    /// Total dataset entry count, from the footer.
    pub fn n_entries(&self) -> u64 {
        self.mapper.n_entries()
    }

    /// Total element count of one column, from the footer.
    pub fn n_elements(&self, handle: ColumnHandle) -> u64 {
        self.mapper.column_index(handle.id).n_elements
    }

    pub fn column_id(&self, handle: ColumnHandle) -> u32 {
        handle.id
    }

    /// Reconstruct a schema from the header's top-level fields, for
    /// callers that attached without one. Each field gets the stored
    /// columns whose names belong to it (the field's own name or a
    /// `"<name>."`-prefixed child column).
    pub fn generate_model(&self) -> Schema {
        let mut schema = Schema::new();
        for field in self.mapper.root_fields() {
            let prefix = format!("{}.", field.name);
            let mut columns = Vec::new();
            for id in 0..self.mapper.n_columns() {
                let model = self.mapper.model(id as u32);
                if model.name == field.name || model.name.starts_with(&prefix) {
                    columns.push(model.clone());
                }
            }
            schema.add_field(SchemaField::new(field.clone(), columns.len(), columns));
        }
        schema
    }
}
