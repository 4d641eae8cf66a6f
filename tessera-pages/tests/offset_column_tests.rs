//! Collection addressing through offset columns, including the
//! cluster-local reset of the cumulative counts.

use std::sync::Arc;
use tessera_pages::{Column, ColumnType, PageSink, PageSource, Schema, SchemaField, INVALID_INDEX};
use tessera_store::MemStore;

const DATASET: &str = "events";

fn hit_value(i: u64) -> f32 {
    i as f32 + 0.25
}

fn collection_schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_field(SchemaField::collection("hits", ColumnType::Real32));
    schema
}

/// Write one collection field. `clusters` gives, per cluster, the element
/// count of each entry; the offset column gets the cluster-local cumulative
/// counts, exactly as a schema layer would produce them.
fn write_collections(store: Arc<MemStore>, clusters: &[&[u64]]) {
    let schema = collection_schema();
    let sink = Arc::new(PageSink::create(DATASET, store, &schema).unwrap());
    let mut offsets =
        Column::connect_sink(schema.fields[0].columns[0].clone(), Arc::clone(&sink)).unwrap();
    let mut elems =
        Column::connect_sink(schema.fields[0].columns[1].clone(), Arc::clone(&sink)).unwrap();

    let mut total_entries = 0u64;
    let mut next_element = 0u64;
    for sizes in clusters {
        let mut local = 0u64;
        for &size in *sizes {
            for _ in 0..size {
                elems.append(hit_value(next_element)).unwrap();
                next_element += 1;
            }
            local += size;
            offsets.append(local).unwrap();
            total_entries += 1;
        }
        offsets.flush().unwrap();
        elems.flush().unwrap();
        sink.commit_cluster(total_entries).unwrap();
    }
    sink.commit_dataset().unwrap();
}

fn open_columns(
    store: Arc<MemStore>,
) -> (Column<MemStore>, Column<MemStore>) {
    let source = Arc::new(PageSource::attach(DATASET, store).unwrap());
    let schema = collection_schema();
    let offsets =
        Column::connect_source(schema.fields[0].columns[0].clone(), Arc::clone(&source)).unwrap();
    let elems =
        Column::connect_source(schema.fields[0].columns[1].clone(), Arc::clone(&source)).unwrap();
    (offsets, elems)
}

#[test]
fn collection_info_resets_at_cluster_boundary() {
    let store = Arc::new(MemStore::new());
    // Cluster 0 holds entries of sizes [3, 0, 4]; cluster 1 holds [2, 3].
    write_collections(Arc::clone(&store), &[&[3, 0, 4], &[2, 3]]);

    let (mut offsets, mut elems) = open_columns(store);
    assert_eq!(offsets.n_elements(), 5);
    assert_eq!(elems.n_elements(), 12);

    let expected = [(0, 3), (3, 0), (3, 4), (7, 2), (9, 3)];
    for (entry, want) in expected.iter().enumerate() {
        let got = offsets.get_collection_info(entry as u64).unwrap();
        assert_eq!(got, *want, "entry {entry}");
    }

    // The ranges address the pointee column globally.
    for entry in 0..5u64 {
        let (start, size) = offsets.get_collection_info(entry).unwrap();
        let mut out = vec![0.0f32; size as usize];
        elems.read_slice(start, &mut out).unwrap();
        for (k, value) in out.iter().enumerate() {
            assert_eq!(*value, hit_value(start + k as u64));
        }
    }
}

#[test]
fn cluster_without_pointee_pages_yields_invalid_start() {
    let store = Arc::new(MemStore::new());
    // Every entry of cluster 0 is empty, so the pointee column commits no
    // pages there and only appears in cluster 1.
    write_collections(Arc::clone(&store), &[&[0, 0], &[2]]);

    let (mut offsets, mut elems) = open_columns(store);
    assert_eq!(elems.n_elements(), 2);

    assert_eq!(offsets.get_collection_info(0).unwrap(), (INVALID_INDEX, 0));
    assert_eq!(offsets.get_collection_info(1).unwrap(), (INVALID_INDEX, 0));

    let (start, size) = offsets.get_collection_info(2).unwrap();
    assert_eq!((start, size), (0, 2));
    assert_eq!(elems.read::<f32>(start).unwrap(), hit_value(0));
    assert_eq!(elems.read::<f32>(start + 1).unwrap(), hit_value(1));
}

#[test]
fn offset_values_read_back_cluster_local() {
    let store = Arc::new(MemStore::new());
    write_collections(Arc::clone(&store), &[&[3, 0, 4], &[2, 3]]);

    let (mut offsets, _) = open_columns(store);
    // Raw offset elements are cluster-local cumulative counts.
    let mut raw = [0u64; 5];
    offsets.read_slice(0, &mut raw).unwrap();
    assert_eq!(raw, [3, 3, 7, 2, 5]);
}
