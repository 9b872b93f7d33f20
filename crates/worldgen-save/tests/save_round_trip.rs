//! Scenario 6 (§8 "Scenarios"): save a world, load it, re-save it, and
//! expect the two serializations to compare byte-equal.

use worldgen::config::WorldConfig;
use worldgen::world::World;
use worldgen_save::{record_to_world, world_to_record, MemoryRecordStore, RecordStore};

fn small_world(seed: u64) -> World {
    let mut cfg = WorldConfig::new(seed, 128, 128);
    cfg.enable_erosion = true;
    cfg.erosion.iterations = 2;
    World::build(cfg).unwrap()
}

#[test]
fn scenario_6_resave_is_byte_identical() {
    let world = small_world(11);
    let record_a = world_to_record(&world, 1_700_000_000_000, None);
    let bytes_a = record_a.encode();

    let (loaded, _player) = record_to_world(&record_a).unwrap();
    let record_b = world_to_record(&loaded, 1_700_000_000_000, None);
    let bytes_b = record_b.encode();

    assert_eq!(bytes_a, bytes_b);
}

#[test]
fn save_size_matches_heightmap_plus_overhead() {
    let world = small_world(3);
    let record = world_to_record(&world, 0, None);

    let heightmap_floats = world.config.width * world.config.height;
    assert_eq!(record.heightmap.len(), heightmap_floats);

    // The encoded size should be at least as large as the raw heightmap
    // floats (4 bytes each); settlements/road points add on top of that.
    let bytes = record.encode();
    assert!(bytes.len() >= heightmap_floats * 4 / 2, "encoded save looks implausibly small");
}

#[test]
fn memory_record_store_round_trips_through_a_real_store() {
    let world = small_world(5);
    let record = world_to_record(&world, 123, None);

    let mut store = MemoryRecordStore::new();
    store.save("slot-a", &record).unwrap();

    let loaded = store.get("slot-a").unwrap().unwrap();
    let (loaded_world, _) = record_to_world(&loaded).unwrap();

    assert_eq!(loaded_world.heightmap.data, world.heightmap.data);
    assert_eq!(loaded_world.settlements, world.settlements);
    assert_eq!(loaded_world.road_graph.roads(), world.road_graph.roads());
}
