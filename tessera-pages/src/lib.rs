//! Columnar page storage over a pluggable object store.
//!
//! A dataset is written column by column: elements accumulate in
//! fixed-capacity [`Page`]s, pages are grouped into clusters, and a footer
//! ties the clusters together. Reading walks the same structure backwards
//! through a per-column page index, with a [`pool::PagePool`] deduplicating
//! pages shared between readers.
//!
//! The write path is driven through [`PageSink`], the read path through
//! [`PageSource`]; [`Column`] is the typed overlay over either.

pub mod column;
pub mod constants;
pub mod element;
pub mod mapper;
pub mod meta;
pub mod model;
pub mod page;
pub mod pool;
pub mod sink;
pub mod source;
pub mod types;

pub use column::Column;
pub use element::ColumnElement;
pub use model::{ColumnModel, ColumnType, Schema, SchemaField};
pub use page::{ClusterInfo, Page, PageBuffer};
pub use sink::PageSink;
pub use source::PageSource;
pub use types::{ClusterId, ColumnHandle, ColumnId, ElementIndex, INVALID_INDEX};
