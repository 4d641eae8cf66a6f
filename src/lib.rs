//! Tessera: columnar, append-only page storage over pluggable object
//! stores.
//!
//! This crate is the primary entrypoint for the tessera workspace. It
//! re-exports the page-storage engine and the store abstractions from the
//! underlying `tessera-*` crates, providing one API surface for users.
//!
//! # Quick Start
//!
//! Write a dataset into an in-memory store and read it back:
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera::store::MemStore;
//! use tessera::{Column, ColumnType, PageSink, PageSource, Schema, SchemaField};
//!
//! let store = Arc::new(MemStore::new());
//! let mut schema = Schema::new();
//! schema.add_field(SchemaField::scalar("energy", ColumnType::Real64));
//!
//! let sink = Arc::new(PageSink::create("run1", Arc::clone(&store), &schema).unwrap());
//! let mut energy = Column::connect_sink(schema.fields[0].columns[0].clone(), sink.clone()).unwrap();
//! energy.append(8.5f64).unwrap();
//! energy.flush().unwrap();
//! sink.commit_cluster(1).unwrap();
//! sink.commit_dataset().unwrap();
//!
//! let source = Arc::new(PageSource::attach("run1", store).unwrap());
//! let mut energy = Column::connect_source(schema.fields[0].columns[0].clone(), source).unwrap();
//! assert_eq!(energy.read::<f64>(0).unwrap(), 8.5);
//! ```
//!
//! # Architecture
//!
//! Tessera is organized as a layered workspace:
//!
//! - **Engine** (`tessera-pages`): pages, clusters, the write sink, the
//!   read source with its page index, and the typed column overlay.
//! - **Storage** (`tessera-store`): the `ObjectStore` trait plus the
//!   in-memory, file-backed and instrumented implementations.
//! - **Errors** (`tessera-result`): the unified error enum and result
//!   alias shared by every crate.

// Re-export the page-storage engine as the primary user-facing API.
pub use tessera_pages::{
    Column, ColumnElement, ColumnModel, ColumnType, PageSink, PageSource, Schema, SchemaField,
};
pub use tessera_pages::{ClusterId, ColumnHandle, ColumnId, ElementIndex, INVALID_INDEX};

// Re-export object-store abstractions.
pub mod store {
    //! Backing object stores for tessera datasets.
    //!
    //! This module provides the `ObjectStore` trait and the concrete
    //! implementations for in-memory and on-disk storage.

    pub use tessera_store::{FileStore, InstrumentedStore, MemStore, ObjectStore, StoreStats};
}

// Re-export result types for error handling.
pub use tessera_result::{Error, Result};
