//! Smoke coverage for the unified `tessera` API surface.

use std::sync::Arc;
use tessera::store::MemStore;
use tessera::{Column, ColumnType, Error, PageSink, PageSource, Schema, SchemaField};

#[test]
fn facade_write_and_read_collections() {
    let store = Arc::new(MemStore::new());
    let mut schema = Schema::new();
    schema.add_field(SchemaField::collection("tracks", ColumnType::Int32));

    let sink = Arc::new(PageSink::create("run1", Arc::clone(&store), &schema).unwrap());
    let mut offsets =
        Column::connect_sink(schema.fields[0].columns[0].clone(), Arc::clone(&sink)).unwrap();
    let mut tracks =
        Column::connect_sink(schema.fields[0].columns[1].clone(), Arc::clone(&sink)).unwrap();

    tracks.append_slice(&[10i32, 11, 12]).unwrap();
    offsets.append(3u64).unwrap();
    tracks.append_slice(&[13i32, 14]).unwrap();
    offsets.append(5u64).unwrap();
    offsets.flush().unwrap();
    tracks.flush().unwrap();
    sink.commit_cluster(2).unwrap();
    sink.commit_dataset().unwrap();

    let source = Arc::new(PageSource::attach("run1", Arc::clone(&store)).unwrap());
    let mut offsets =
        Column::connect_source(schema.fields[0].columns[0].clone(), Arc::clone(&source)).unwrap();
    let mut tracks =
        Column::connect_source(schema.fields[0].columns[1].clone(), Arc::clone(&source)).unwrap();

    assert_eq!(source.n_entries(), 2);
    assert_eq!(offsets.get_collection_info(1).unwrap(), (3, 2));
    assert_eq!(tracks.read::<i32>(4).unwrap(), 14);

    let missing = PageSource::attach("run2", store).err().expect("absent dataset");
    assert!(matches!(missing, Error::NotFound));
}
