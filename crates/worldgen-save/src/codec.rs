//! Conversion between the live `World` and the plain-data `SaveRecord`
//! (§4.10, §6). `World` never depends on this crate's types; the
//! conversion lives here so the core pipeline stays free of the save
//! format's concerns.

use worldgen::config::WorldConfig;
use worldgen::heightmap::Heightmap;
use worldgen::islands::label_islands;
use worldgen::road_graph::RoadGraph;
use worldgen::roads::RoadSegment;
use worldgen::settlements::Settlement;
use worldgen::time::GameTime;
use worldgen::world::World;

use crate::record::{
    category_to_u8, u8_to_category, SaveRecord, SaveRoadMeta, SaveRoadV1, SaveRoads, SaveRoadsV2,
    SavePlayer, SaveSettlement, SaveTime,
};
use crate::save_error::SaveError;
use crate::version::CURRENT_SAVE_VERSION;

/// Flatten the final road list into the version-2 metadata + point-buffer
/// layout: one contiguous array of xy pairs, sliced by per-road
/// `(offset, count)` (§4.10).
fn roads_to_v2(roads: &[RoadSegment]) -> SaveRoadsV2 {
    let mut points_data = Vec::new();
    let mut metadata = Vec::with_capacity(roads.len());

    for road in roads {
        let points_offset = (points_data.len() / 2) as u32;
        for &(x, y) in &road.points {
            points_data.push(x);
            points_data.push(y);
        }
        let (x1, y1) = road.points.first().copied().unwrap_or((0.0, 0.0));
        let (x2, y2) = road.points.last().copied().unwrap_or((0.0, 0.0));
        metadata.push(SaveRoadMeta {
            x1,
            y1,
            x2,
            y2,
            length: road.length,
            a_index: road.a as u32,
            b_index: road.b as u32,
            points_offset,
            points_count: road.points.len() as u32,
        });
    }

    SaveRoadsV2 { metadata, points_data }
}

/// Reconstruct the road list from a version-2 record. Returns a
/// `SaveError::Decode` if an entry's `(offset, count)` falls outside
/// `points_data` (metadata/points inconsistency, §7).
fn roads_from_v2(v2: &SaveRoadsV2) -> Result<Vec<RoadSegment>, SaveError> {
    v2.metadata
        .iter()
        .map(|meta| {
            let start = meta.points_offset as usize * 2;
            let count = meta.points_count as usize;
            let end = start + count * 2;
            if end > v2.points_data.len() {
                return Err(SaveError::Decode(format!(
                    "road points range [{start}..{end}) exceeds points_data length {}",
                    v2.points_data.len()
                )));
            }
            let points = v2.points_data[start..end]
                .chunks_exact(2)
                .map(|pair| (pair[0], pair[1]))
                .collect();
            Ok(RoadSegment {
                a: meta.a_index as usize,
                b: meta.b_index as usize,
                length: meta.length,
                points,
            })
        })
        .collect()
}

fn roads_from_v1(v1: &[SaveRoadV1]) -> Vec<RoadSegment> {
    v1.iter()
        .map(|r| RoadSegment {
            a: r.a as usize,
            b: r.b as usize,
            length: r.length,
            points: r.points.iter().map(|p| (p.x, p.y)).collect(),
        })
        .collect()
}

fn settlement_to_save(s: &Settlement) -> SaveSettlement {
    SaveSettlement {
        x: s.x,
        y: s.y,
        elevation: s.elevation,
        suitability: s.suitability,
        island_id: s.island_id,
        island_area: s.island_area,
        road_degree: s.road_degree,
        second_hop_reach: s.second_hop_reach,
        city_score: s.city_score,
        category: category_to_u8(s.category),
    }
}

fn settlement_from_save(s: &SaveSettlement) -> Settlement {
    Settlement::from_parts(
        s.x,
        s.y,
        s.elevation,
        s.suitability,
        s.island_id,
        s.island_area,
        s.road_degree,
        s.second_hop_reach,
        s.city_score,
        u8_to_category(s.category),
    )
}

/// Build a version-2 save record from a live world. The record always
/// writes the current version (§4.10: "Writers must always emit the newer
/// form").
pub fn world_to_record(
    world: &World,
    created_at: u64,
    player: Option<SavePlayer>,
) -> SaveRecord {
    SaveRecord {
        version: CURRENT_SAVE_VERSION,
        seed: world.config.seed,
        width: world.config.width as u32,
        height: world.config.height as u32,
        use_shading: world.config.use_shading,
        enable_erosion: world.config.enable_erosion,
        created_at,
        heightmap: world.heightmap.data.clone(),
        settlements: world.settlements.iter().map(settlement_to_save).collect(),
        roads: SaveRoads::V2(roads_to_v2(world.road_graph.roads())),
        time: SaveTime {
            total_days: world.time.total_days(),
            time_speed: world.time.speed(),
        },
        player,
    }
}

/// Reconstruct a `World` from a save record, plus the player placement if
/// one was stored. Accepts both version 1 and version 2 road layouts
/// (§4.10). Islands are recomputed from the loaded heightmap (they are not
/// persisted); doing so is deterministic and cheap, and exactly reproduces
/// the labelling the original build produced over the same elevations.
pub fn record_to_world(record: &SaveRecord) -> Result<(World, Option<SavePlayer>), SaveError> {
    if record.version > CURRENT_SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: CURRENT_SAVE_VERSION,
            found: record.version,
        });
    }

    let width = record.width as usize;
    let height = record.height as usize;
    let expected_len = width.checked_mul(height).unwrap_or(usize::MAX);
    if record.heightmap.len() != expected_len {
        return Err(SaveError::Decode(format!(
            "heightmap length {} does not match width*height {}",
            record.heightmap.len(),
            expected_len
        )));
    }

    let mut config = WorldConfig::new(record.seed, width, height);
    config.use_shading = record.use_shading;
    config.enable_erosion = record.enable_erosion;
    config.validate()?;

    let heightmap = Heightmap {
        data: record.heightmap.clone(),
        width,
        height,
    };

    let islands = label_islands(&heightmap, config.settlements.coast_threshold);

    let settlements: Vec<Settlement> = record.settlements.iter().map(settlement_from_save).collect();

    let roads = match &record.roads {
        SaveRoads::V2(v2) => roads_from_v2(v2)?,
        SaveRoads::V1(v1) => roads_from_v1(v1),
    };

    let road_graph = RoadGraph::build(settlements.len(), roads);

    let time = GameTime::from_record(record.time.total_days, record.time.time_speed)?;

    let world = World::from_parts(config, heightmap, islands, settlements, road_graph, time);

    Ok((world, record.player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SavePoint;
    use worldgen::config::WorldConfig as Cfg;

    fn small_world(seed: u64) -> World {
        let mut cfg = Cfg::new(seed, 64, 64);
        cfg.enable_erosion = false;
        World::build(cfg).unwrap()
    }

    #[test]
    fn test_world_round_trips_through_record() {
        let world = small_world(3);
        let record = world_to_record(&world, 1_700_000_000_000, None);
        assert!(record.is_current_version());

        let (loaded, player) = record_to_world(&record).unwrap();
        assert!(player.is_none());
        assert_eq!(loaded.heightmap.data, world.heightmap.data);
        assert_eq!(loaded.settlements, world.settlements);
        assert_eq!(loaded.road_graph.roads(), world.road_graph.roads());
        assert_eq!(loaded.time.total_days(), world.time.total_days());
    }

    #[test]
    fn test_record_round_trip_is_byte_identical_on_reencode() {
        let world = small_world(9);
        let record = world_to_record(&world, 42, None);
        let bytes_a = record.encode();
        let (loaded, _) = record_to_world(&record).unwrap();
        let record_b = world_to_record(&loaded, 42, None);
        let bytes_b = record_b.encode();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn test_player_round_trips() {
        let world = small_world(5);
        let player = Some(SavePlayer {
            x: 3.0,
            y: 4.0,
            current_settlement_index: Some(0),
        });
        let record = world_to_record(&world, 1, player);
        let (_, loaded_player) = record_to_world(&record).unwrap();
        assert_eq!(loaded_player, player);
    }

    #[test]
    fn test_future_version_is_rejected() {
        let world = small_world(1);
        let mut record = world_to_record(&world, 1, None);
        record.version = CURRENT_SAVE_VERSION + 1;
        let err = record_to_world(&record).unwrap_err();
        assert!(matches!(err, SaveError::VersionMismatch { .. }));
    }

    #[test]
    fn test_mismatched_heightmap_length_is_rejected() {
        let world = small_world(1);
        let mut record = world_to_record(&world, 1, None);
        record.heightmap.pop();
        let err = record_to_world(&record).unwrap_err();
        assert!(matches!(err, SaveError::Decode(_)));
    }

    #[test]
    fn test_v1_roads_load_into_the_common_structure() {
        let v1_roads = SaveRoads::V1(vec![SaveRoadV1 {
            a: 0,
            b: 1,
            length: 10.0,
            points: vec![SavePoint { x: 0.0, y: 0.0 }, SavePoint { x: 10.0, y: 0.0 }],
        }]);
        let record = SaveRecord {
            version: 1,
            seed: 1,
            width: 16,
            height: 16,
            use_shading: true,
            enable_erosion: false,
            created_at: 0,
            heightmap: vec![0.9; 256],
            settlements: vec![
                SaveSettlement {
                    x: 0.0,
                    y: 0.0,
                    elevation: 0.9,
                    suitability: 0.5,
                    island_id: 0,
                    island_area: 256,
                    road_degree: 1,
                    second_hop_reach: 1,
                    city_score: 0.5,
                    category: 0,
                },
                SaveSettlement {
                    x: 10.0,
                    y: 0.0,
                    elevation: 0.9,
                    suitability: 0.5,
                    island_id: 0,
                    island_area: 256,
                    road_degree: 1,
                    second_hop_reach: 1,
                    city_score: 0.5,
                    category: 0,
                },
            ],
            roads: v1_roads,
            time: SaveTime {
                total_days: 0,
                time_speed: 1,
            },
            player: None,
        };
        let (world, _) = record_to_world(&record).unwrap();
        assert_eq!(world.road_graph.roads().len(), 1);
        assert_eq!(world.road_graph.roads()[0].a, 0);
    }
}
