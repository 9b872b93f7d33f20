//! The `World`: the single owned value tying every pipeline stage and the
//! two online services (road pathfinding, game time) together (§6).
//!
//! Save/load lives in the `worldgen-save` crate, which depends on this one
//! and builds its record format from `World`'s public fields; `World`
//! itself never references a serialisation format.

use crate::classify::classify_settlements;
use crate::config::WorldConfig;
use crate::erosion::erode;
use crate::error::WorldError;
use crate::heightmap::{build_heightmap, Heightmap};
use crate::islands::{label_islands, IslandMap};
use crate::road_graph::RoadGraph;
use crate::roads::plan_roads;
use crate::settlements::{sample_settlements, Settlement};
use crate::time::{CalendarDate, GameTime};

/// The result of a shortest-path query: node sequence, reconstructed
/// polyline, and total distance.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelPath {
    pub nodes: Vec<usize>,
    pub polyline: Vec<(f32, f32)>,
    pub distance: f32,
}

/// The fully generated, immutable-after-construction world (§3 Data Model,
/// "Ownership"). Owns the heightmap, islands, settlements, road graph and
/// time service exclusively; external collaborators get read-only views.
#[derive(Debug, Clone)]
pub struct World {
    pub config: WorldConfig,
    pub heightmap: Heightmap,
    pub islands: IslandMap,
    pub settlements: Vec<Settlement>,
    pub road_graph: RoadGraph,
    pub time: GameTime,
}

impl World {
    /// Run the full pipeline: `noise -> contrast -> erosion*iterations ->
    /// contrast -> islands -> settlements -> roads -> classification`
    /// (§5 "Ordering guarantees"). Every stage observes the finalised
    /// output of every earlier stage.
    pub fn build(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let mut heightmap = build_heightmap(config.seed, config.width, config.height, &config.noise);

        if config.enable_erosion {
            erode(&mut heightmap, &config.erosion);
        }

        let islands = label_islands(&heightmap, config.settlements.coast_threshold);

        let mut settlements = sample_settlements(&heightmap, &islands, config.seed, &config.settlements);

        let roads = plan_roads(&heightmap, &settlements, &config.roads);

        classify_settlements(&mut settlements, &roads, &config.classifier);

        let road_graph = RoadGraph::build(settlements.len(), roads);

        log::info!(
            "world built: seed={} {}x{} islands={} settlements={} roads={}",
            config.seed,
            config.width,
            config.height,
            islands.areas.len(),
            settlements.len(),
            road_graph.roads().len(),
        );

        Ok(Self {
            config,
            heightmap,
            islands,
            settlements,
            road_graph,
            time: GameTime::new(),
        })
    }

    /// Reassemble a `World` from already-decoded pipeline output (used by
    /// the save codec to load a record without rerunning generation).
    pub fn from_parts(
        config: WorldConfig,
        heightmap: Heightmap,
        islands: IslandMap,
        settlements: Vec<Settlement>,
        road_graph: RoadGraph,
        time: GameTime,
    ) -> Self {
        Self {
            config,
            heightmap,
            islands,
            settlements,
            road_graph,
            time,
        }
    }

    /// Shortest travel path between two settlement indices, or `None` when
    /// unreachable or either index is out of range.
    pub fn shortest_path(&self, from: usize, to: usize) -> Option<TravelPath> {
        let result = self.road_graph.shortest_path(from, to)?;
        let polyline = self.road_graph.reconstruct_polyline(&result.nodes, &self.settlements);
        Some(TravelPath {
            nodes: result.nodes,
            polyline,
            distance: result.distance,
        })
    }

    pub fn tick(&mut self, now_ms: u64) {
        self.time.tick(now_ms);
    }

    pub fn set_time_speed(&mut self, speed: u8) -> Result<(), WorldError> {
        self.time.set_speed(speed)
    }

    pub fn current_date(&self) -> CalendarDate {
        self.time.current_date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> WorldConfig {
        let mut cfg = WorldConfig::new(seed, 96, 96);
        cfg.enable_erosion = false;
        cfg
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = World::build(small_config(1)).unwrap();
        let b = World::build(small_config(1)).unwrap();
        assert_eq!(a.heightmap.data, b.heightmap.data);
        assert_eq!(a.settlements, b.settlements);
        assert_eq!(a.road_graph.roads(), b.road_graph.roads());
    }

    #[test]
    fn test_build_rejects_zero_dimensions() {
        let cfg = WorldConfig::new(1, 0, 10);
        assert!(World::build(cfg).is_err());
    }

    #[test]
    fn test_shortest_path_round_trips_through_reconstruction() {
        let world = World::build(small_config(7)).unwrap();
        if world.settlements.len() >= 2 {
            if let Some(path) = world.shortest_path(0, world.settlements.len() - 1) {
                assert!(!path.polyline.is_empty());
                assert!(path.distance >= 0.0);
            }
        }
    }

    #[test]
    fn test_shortest_path_out_of_range_is_none() {
        let world = World::build(small_config(7)).unwrap();
        assert!(world.shortest_path(0, world.settlements.len() + 10).is_none());
    }

    #[test]
    fn test_tick_and_time_speed_are_exposed() {
        let mut world = World::build(small_config(3)).unwrap();
        world.set_time_speed(4).unwrap();
        world.tick(0);
        world.tick(1000);
        assert_eq!(world.time.total_days(), 4);
        let date = world.current_date();
        assert_eq!(date.year, 0);
    }
}
