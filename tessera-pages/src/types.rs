//! Identifiers shared across the page-storage subsystem.
//!
//! All name-to-id resolution happens once, at dataset create or attach time;
//! hot paths index dense vectors with these small integers only.

/// Dense column identifier, assigned in registration order.
pub type ColumnId = u32;

/// Monotonically increasing cluster identifier.
pub type ClusterId = u64;

/// Global element index within one column, or global entry index within the
/// dataset.
pub type ElementIndex = u64;

/// Sentinel for "no such index", e.g. the pointee offset of a cluster in
/// which the pointee column contributed no pages.
pub const INVALID_INDEX: ElementIndex = ElementIndex::MAX;

/// Handle returned by column registration; all sink/source entry points take
/// one instead of a column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHandle {
    pub id: ColumnId,
}

impl ColumnHandle {
    pub fn new(id: ColumnId) -> Self {
        Self { id }
    }
}
