//! On-disk metadata objects and the well-known key scheme.
//!
//! Metadata objects are bitcode-encoded; page payloads are raw
//! little-endian element bytes stored as opaque blobs. The key strings are
//! part of the format and must not change.

use crate::model::{ColumnModel, FieldModel};
use crate::types::{ClusterId, ColumnId};
use bitcode::{Decode, Encode};
use tessera_result::{Error, Result};

/// Dataset header key.
pub const KEY_HEADER: &str = "NTPLH";
/// Dataset footer key.
pub const KEY_FOOTER: &str = "NTPLF";
/// Cluster footer key prefix; the cluster id is appended in decimal.
pub const KEY_CLUSTER_FOOTER: &str = "NTPLC";
/// Page payload key prefix; cluster id, column id and page ordinal follow,
/// joined by [`KEY_SEPARATOR`].
pub const KEY_PAGE_PAYLOAD: &str = "NTPLP";
pub const KEY_SEPARATOR: &str = "_";

/// Key of the footer object of cluster `cluster_id`.
pub fn cluster_footer_key(cluster_id: ClusterId) -> String {
    format!("{KEY_CLUSTER_FOOTER}{cluster_id}")
}

/// Key of the payload of the `page_in_cluster`-th page that `column_id`
/// contributed to `cluster_id`.
pub fn page_payload_key(cluster_id: ClusterId, column_id: ColumnId, page_in_cluster: u64) -> String {
    format!(
        "{KEY_PAGE_PAYLOAD}{cluster_id}{KEY_SEPARATOR}{column_id}{KEY_SEPARATOR}{page_in_cluster}"
    )
}

/// Scope an object key to a named dataset.
pub fn dataset_key(dataset: &str, key: &str) -> String {
    format!("{dataset}/{key}")
}

/// Dataset-wide metadata written once at creation. Immutable afterwards.
#[derive(Debug, Clone, Default, Encode, Decode)]
pub struct Header {
    pub fields: Vec<FieldModel>,
    pub columns: Vec<ColumnModel>,
}

/// Dataset-wide summary written at close. The read path treats it as
/// authoritative for sizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct Footer {
    pub n_clusters: u64,
    pub n_entries: u64,
    pub n_elements_per_column: Vec<u64>,
}

/// Per-column list of page range-starts within one cluster. Empty if the
/// column contributed no pages (e.g. all-empty collections).
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct PageList {
    /// Global element index at which each page begins; strictly increasing.
    pub range_starts: Vec<u64>,
}

/// Per-cluster summary written when the cluster is committed.
#[derive(Debug, Clone, Default, Encode, Decode)]
pub struct ClusterFooter {
    /// Number of dataset entries in this cluster.
    pub n_entries: u64,
    /// First entry index of this cluster.
    pub entry_range_start: u64,
    /// Indexed by column id; parallel to the header's column list.
    pub pages_per_column: Vec<PageList>,
}

pub(crate) fn encode<T: Encode>(value: &T) -> Vec<u8> {
    bitcode::encode(value)
}

pub(crate) fn decode<'a, T: Decode<'a>>(bytes: &'a [u8], what: &str) -> Result<T> {
    bitcode::decode(bytes).map_err(|e| Error::Corrupt(format!("{what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_payload_keys_are_stable() {
        assert_eq!(page_payload_key(0, 1, 2), "NTPLP0_1_2");
        assert_eq!(page_payload_key(12, 0, 7), "NTPLP12_0_7");
        assert_eq!(cluster_footer_key(3), "NTPLC3");
        assert_eq!(dataset_key("events", KEY_HEADER), "events/NTPLH");
    }

    #[test]
    fn footer_roundtrip_is_byte_identical() {
        let footer = Footer {
            n_clusters: 2,
            n_entries: 100,
            n_elements_per_column: vec![100, 250],
        };
        let a = encode(&footer);
        let b = encode(&decode::<Footer>(&a, "footer").unwrap());
        assert_eq!(a, b);
    }
}
