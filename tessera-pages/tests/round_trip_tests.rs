//! End-to-end write/attach/read coverage over both store backends.

use std::sync::Arc;
use tessera_pages::{Column, ColumnType, PageSink, PageSource, Schema, SchemaField};
use tessera_store::{FileStore, MemStore, ObjectStore};

const DATASET: &str = "events";
/// Two clusters, the first larger than one default page (10_000 elements)
/// so reads have to cross a page boundary inside a cluster.
const CLUSTER_ENTRIES: [u64; 2] = [12_000, 13_000];

fn pt_value(i: u64) -> f64 {
    i as f64 * 0.5
}

fn charge_value(i: u64) -> i32 {
    if i % 3 == 0 { -1 } else { 1 }
}

fn scalar_schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_field(SchemaField::scalar("pt", ColumnType::Real64));
    schema.add_field(SchemaField::scalar("charge", ColumnType::Int32));
    schema
}

fn write_dataset<S: ObjectStore>(store: Arc<S>) {
    let schema = scalar_schema();
    let sink = Arc::new(PageSink::create(DATASET, store, &schema).expect("create dataset"));

    let mut pt =
        Column::connect_sink(schema.fields[0].columns[0].clone(), Arc::clone(&sink)).unwrap();
    let mut charge =
        Column::connect_sink(schema.fields[1].columns[0].clone(), Arc::clone(&sink)).unwrap();

    let mut total = 0u64;
    for n_entries in CLUSTER_ENTRIES {
        for _ in 0..n_entries {
            pt.append(pt_value(total)).unwrap();
            charge.append(charge_value(total)).unwrap();
            total += 1;
        }
        pt.flush().unwrap();
        charge.flush().unwrap();
        sink.commit_cluster(total).unwrap();
    }
    sink.commit_dataset().unwrap();
}

fn check_dataset<S: ObjectStore>(store: Arc<S>) {
    let source = Arc::new(PageSource::attach(DATASET, store).expect("attach dataset"));
    let total: u64 = CLUSTER_ENTRIES.iter().sum();
    assert_eq!(source.n_entries(), total);

    let schema = scalar_schema();
    let mut pt =
        Column::connect_source(schema.fields[0].columns[0].clone(), Arc::clone(&source)).unwrap();
    let mut charge =
        Column::connect_source(schema.fields[1].columns[0].clone(), Arc::clone(&source)).unwrap();
    assert_eq!(pt.n_elements(), total);
    assert_eq!(charge.n_elements(), total);

    // Scattered point reads, including page and cluster boundaries.
    for i in [0, 1, 9_999, 10_000, 11_999, 12_000, 12_001, total - 1] {
        assert_eq!(pt.read::<f64>(i).unwrap(), pt_value(i), "pt[{i}]");
        assert_eq!(charge.read::<i32>(i).unwrap(), charge_value(i), "charge[{i}]");
    }

    // A bulk read crossing the page boundary inside cluster 0 and one
    // crossing the cluster boundary.
    for first in [9_995, 11_995] {
        let mut out = vec![0.0f64; 10];
        pt.read_slice(first, &mut out).unwrap();
        for (k, value) in out.iter().enumerate() {
            assert_eq!(*value, pt_value(first + k as u64));
        }
    }
}

#[test]
fn round_trip_mem_store() {
    let store = Arc::new(MemStore::new());
    write_dataset(Arc::clone(&store));
    check_dataset(store);
}

#[test]
fn round_trip_file_store() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(Arc::new(FileStore::create(dir.path()).unwrap()));
    // Reopen from disk rather than reusing the writer's handle.
    check_dataset(Arc::new(FileStore::open(dir.path()).unwrap()));
}

#[test]
fn map_matches_read() {
    let store = Arc::new(MemStore::new());
    write_dataset(Arc::clone(&store));

    let source = Arc::new(PageSource::attach(DATASET, store).unwrap());
    let schema = scalar_schema();
    let mut pt =
        Column::connect_source(schema.fields[0].columns[0].clone(), Arc::clone(&source)).unwrap();

    for i in [0, 7, 9_999, 10_000, 12_345] {
        assert_eq!(pt.map::<f64>(i).unwrap(), pt_value(i));
    }

    // A run inside one page maps zero-copy; one that would cross the page
    // boundary does not, and the caller falls back to read_slice.
    let mapped = pt.map_slice::<f64>(100, 50).unwrap().expect("within one page");
    for (k, value) in mapped.iter().enumerate() {
        assert_eq!(*value, pt_value(100 + k as u64));
    }
    assert!(pt.map_slice::<f64>(9_995, 10).unwrap().is_none());
}

/// Bulk appends: one batch that fits the head page contiguously, one that
/// exceeds a whole fresh page and degrades to per-element appends.
#[test]
fn append_slice_round_trip() {
    let store = Arc::new(MemStore::new());
    let schema = scalar_schema();
    let sink = Arc::new(PageSink::create(DATASET, Arc::clone(&store), &schema).unwrap());
    let mut pt =
        Column::connect_sink(schema.fields[0].columns[0].clone(), Arc::clone(&sink)).unwrap();

    let big: Vec<f64> = (0u64..15_000).map(pt_value).collect();
    let small: Vec<f64> = (15_000u64..15_100).map(pt_value).collect();
    pt.append_slice(&big).unwrap();
    pt.append_slice(&small).unwrap();
    assert_eq!(pt.n_elements(), 15_100);

    pt.flush().unwrap();
    sink.commit_cluster(15_100).unwrap();
    sink.commit_dataset().unwrap();

    let source = Arc::new(PageSource::attach(DATASET, store).unwrap());
    let mut pt =
        Column::connect_source(schema.fields[0].columns[0].clone(), Arc::clone(&source)).unwrap();
    assert_eq!(pt.n_elements(), 15_100);
    let mut out = vec![0.0f64; 15_100];
    pt.read_slice(0, &mut out).unwrap();
    for (i, value) in out.iter().enumerate() {
        assert_eq!(*value, pt_value(i as u64), "element {i}");
    }
}

#[test]
fn attach_missing_dataset_fails() {
    let store = Arc::new(MemStore::new());
    let err = PageSource::attach("nope", store).err().expect("attach must fail");
    assert!(matches!(err, tessera_result::Error::NotFound));
}

#[test]
fn generated_model_lists_fields_and_columns() {
    let store = Arc::new(MemStore::new());
    write_dataset(Arc::clone(&store));

    let source = PageSource::attach(DATASET, store).unwrap();
    let schema = source.generate_model();
    let names: Vec<&str> = schema.fields.iter().map(|f| f.field.name.as_str()).collect();
    assert_eq!(names, ["pt", "charge"]);
    assert_eq!(schema.n_columns(), 2);
    assert_eq!(schema.fields[0].columns[0].column_type, ColumnType::Real64);
}
