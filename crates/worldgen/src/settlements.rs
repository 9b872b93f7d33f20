//! Settlement categories, the settlement record, and the strided Bernoulli
//! sampler that places them (§4.5).

use std::collections::HashMap;

use crate::config::SettlementConfig;
use crate::heightmap::Heightmap;
use crate::islands::IslandMap;
use crate::rng::Mulberry32;

/// A settlement's tier, assigned by the classifier (§4.7). Defaults to
/// `Village` until classification runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Village,
    Town,
    City,
}

/// A placed settlement. Created during sampling, annotated during
/// classification, immutable thereafter. Its positional index in the
/// settlement list is its node id in the road graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub x: f32,
    pub y: f32,
    pub elevation: f32,
    pub suitability: f32,
    pub island_id: i32,
    pub island_area: u32,
    pub road_degree: u32,
    pub second_hop_reach: u32,
    pub city_score: f32,
    pub category: Category,
}

impl Settlement {
    fn new(x: f32, y: f32, elevation: f32, suitability: f32, island_id: i32, island_area: u32) -> Self {
        Self {
            x,
            y,
            elevation,
            suitability,
            island_id,
            island_area,
            road_degree: 0,
            second_hop_reach: 0,
            city_score: 0.0,
            category: Category::Village,
        }
    }

    /// Reconstruct a settlement from its saved fields (used by the save
    /// codec to rebuild a `Settlement` without rerunning the sampler).
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        x: f32,
        y: f32,
        elevation: f32,
        suitability: f32,
        island_id: i32,
        island_area: u32,
        road_degree: u32,
        second_hop_reach: u32,
        city_score: f32,
        category: Category,
    ) -> Self {
        Self {
            x,
            y,
            elevation,
            suitability,
            island_id,
            island_area,
            road_degree,
            second_hop_reach,
            city_score,
            category,
        }
    }

    pub fn distance(&self, other: &Settlement) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Suitability: 0 below `coast_threshold` or at/above `fade_out_height`,
/// else linear from 1 at the coast down to 0 at the fade-out height.
fn suitability_for(elevation: f32, cfg: &SettlementConfig) -> f32 {
    if elevation < cfg.coast_threshold || elevation >= cfg.fade_out_height {
        return 0.0;
    }
    (cfg.fade_out_height - elevation) / (cfg.fade_out_height - cfg.coast_threshold)
}

/// `base + (1-base) * (area/maxArea)^exponent`.
fn island_factor(area: u32, max_area: u32, cfg: &SettlementConfig) -> f32 {
    if max_area == 0 {
        return cfg.island_factor_base;
    }
    let ratio = area as f32 / max_area as f32;
    cfg.island_factor_base + (1.0 - cfg.island_factor_base) * ratio.powf(cfg.island_factor_exponent)
}

/// Uniform-grid spatial index over placed settlement positions, bucketed by
/// `floor(pos / bucket_size)`. Rejection queries scan the 3x3 neighbourhood
/// of buckets around a candidate point.
struct SpatialIndex {
    bucket_size: f32,
    buckets: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialIndex {
    fn new(bucket_size: f32) -> Self {
        Self {
            bucket_size,
            buckets: HashMap::new(),
        }
    }

    fn bucket_of(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.bucket_size).floor() as i32,
            (y / self.bucket_size).floor() as i32,
        )
    }

    fn insert(&mut self, idx: usize, x: f32, y: f32) {
        let key = self.bucket_of(x, y);
        self.buckets.entry(key).or_default().push(idx);
    }

    /// True if any indexed point lies within `min_distance` of `(x, y)`.
    fn has_neighbour_within(
        &self,
        x: f32,
        y: f32,
        min_distance: f32,
        settlements: &[Settlement],
    ) -> bool {
        let (bx, by) = self.bucket_of(x, y);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = self.buckets.get(&(bx + dx, by + dy)) {
                    for &idx in bucket {
                        let s = &settlements[idx];
                        let ddx = s.x - x;
                        let ddy = s.y - y;
                        if (ddx * ddx + ddy * ddy).sqrt() < min_distance {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

/// Strided, seeded Bernoulli sampling weighted by elevation suitability and
/// island area, with minimum-distance rejection (§4.5). `seed` drives a
/// single mulberry32 stream; every sampling decision advances it in scan
/// order so the output is deterministic and regression-checkable.
pub fn sample_settlements(
    hm: &Heightmap,
    islands: &IslandMap,
    seed: u64,
    cfg: &SettlementConfig,
) -> Vec<Settlement> {
    let mut rng = Mulberry32::new(seed as u32);
    let mut settlements: Vec<Settlement> = Vec::new();
    let mut index = SpatialIndex::new(cfg.min_distance.max(1.0));

    let stride = cfg.stride.max(1);
    let mut y = 0usize;
    while y < hm.height {
        let mut x = 0usize;
        while x < hm.width {
            if settlements.len() >= cfg.max_settlements {
                log::debug!("settlement sampler stopped at cap {}", cfg.max_settlements);
                return settlements;
            }

            let cell_idx = hm.index(x, y);
            let elevation = hm.data[cell_idx];
            let suitability = suitability_for(elevation, cfg);

            if suitability > 0.0 {
                let island_id = islands.ids[cell_idx];
                let area = if island_id >= 0 {
                    islands.areas[island_id as usize]
                } else {
                    0
                };
                let factor = island_factor(area, islands.max_area, cfg);
                let probability = cfg.base_chance * suitability * suitability * factor;

                let roll = rng.next_f32();
                if roll < probability {
                    let px = x as f32 + 0.5;
                    let py = y as f32 + 0.5;
                    if !index.has_neighbour_within(px, py, cfg.min_distance, &settlements) {
                        let settlement_idx = settlements.len();
                        settlements.push(Settlement::new(
                            px, py, elevation, suitability, island_id, area,
                        ));
                        index.insert(settlement_idx, px, py);
                    }
                }
            }

            x += stride;
        }
        y += stride;
    }

    settlements
}
