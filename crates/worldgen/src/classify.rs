//! Settlement classifier: degree, 2-hop reach, blended score, city
//! selection under a minimum hop-distance constraint, town threshold
//! (§4.7).

use std::collections::VecDeque;

use crate::config::ClassifierConfig;
use crate::roads::RoadSegment;
use crate::settlements::{Category, Settlement};

/// Adjacency built from the final road list: `neighbours[i]` lists the
/// settlement indices directly connected to `i`.
fn build_adjacency(n: usize, roads: &[RoadSegment]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); n];
    for road in roads {
        adjacency[road.a].push(road.b);
        adjacency[road.b].push(road.a);
    }
    adjacency
}

/// `|N(v) \u{222a} {w : w \u{2208} N(u), u \u{2208} N(v), w \u{2260} v}|`
fn two_hop_reach(v: usize, adjacency: &[Vec<usize>]) -> usize {
    let mut reach: std::collections::HashSet<usize> = adjacency[v].iter().copied().collect();
    for &u in &adjacency[v] {
        for &w in &adjacency[u] {
            if w != v {
                reach.insert(w);
            }
        }
    }
    reach.len()
}

/// Bounded BFS hop distance from `start` to `goal`, giving up (returning
/// `None`) once the frontier exceeds `bound` hops.
fn hop_distance_within(start: usize, goal: usize, adjacency: &[Vec<usize>], bound: u32) -> Option<u32> {
    if start == goal {
        return Some(0);
    }
    let mut visited = vec![false; adjacency.len()];
    visited[start] = true;
    let mut queue = VecDeque::new();
    queue.push_back((start, 0u32));

    while let Some((node, dist)) = queue.pop_front() {
        if dist >= bound {
            continue;
        }
        for &next in &adjacency[node] {
            if visited[next] {
                continue;
            }
            if next == goal {
                return Some(dist + 1);
            }
            visited[next] = true;
            queue.push_back((next, dist + 1));
        }
    }
    None
}

/// True if `candidate`'s hop distance to every settlement in `admitted` is
/// at least `min_hops`.
fn far_enough_from_all(candidate: usize, admitted: &[usize], adjacency: &[Vec<usize>], min_hops: u32) -> bool {
    admitted.iter().all(|&city| {
        match hop_distance_within(candidate, city, adjacency, min_hops.saturating_sub(1)) {
            Some(_) => false,
            None => true,
        }
    })
}

/// Classify settlements in place: fills `road_degree`, `second_hop_reach`,
/// `city_score`, and `category` on each entry of `settlements`, using the
/// adjacency implied by `roads`.
pub fn classify_settlements(settlements: &mut [Settlement], roads: &[RoadSegment], cfg: &ClassifierConfig) {
    let n = settlements.len();
    if n == 0 {
        return;
    }
    let adjacency = build_adjacency(n, roads);

    let degrees: Vec<u32> = adjacency.iter().map(|a| a.len() as u32).collect();
    let reaches: Vec<u32> = (0..n).map(|v| two_hop_reach(v, &adjacency) as u32).collect();
    let mean_neighbour_suitability: Vec<f32> = (0..n)
        .map(|v| {
            if adjacency[v].is_empty() {
                0.0
            } else {
                let sum: f32 = adjacency[v].iter().map(|&u| settlements[u].suitability).sum();
                sum / adjacency[v].len() as f32
            }
        })
        .collect();

    let max_suitability = settlements
        .iter()
        .map(|s| s.suitability)
        .fold(0.0_f32, f32::max)
        .max(f32::EPSILON);
    let max_degree = degrees.iter().copied().max().unwrap_or(0).max(1) as f32;
    let max_reach = reaches.iter().copied().max().unwrap_or(0).max(1) as f32;

    let mut raw_scores = vec![0.0_f32; n];
    for v in 0..n {
        let connectivity_bonus = if degrees[v] >= 4 {
            0.05
        } else if degrees[v] >= 2 {
            0.02
        } else {
            0.0
        };
        let raw = 0.55 * (settlements[v].suitability / max_suitability)
            + 0.20 * (degrees[v] as f32 / max_degree)
            + 0.15 * mean_neighbour_suitability[v]
            + 0.25 * (reaches[v] as f32 / max_reach)
            + connectivity_bonus;
        raw_scores[v] = raw.clamp(0.0, 1.4);
    }

    for v in 0..n {
        settlements[v].road_degree = degrees[v];
        settlements[v].second_hop_reach = reaches[v];
        settlements[v].city_score = raw_scores[v] / 1.4;
        settlements[v].category = Category::Village;
    }

    let max_city_score = settlements.iter().map(|s| s.city_score).fold(0.0_f32, f32::max);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        settlements[b]
            .city_score
            .partial_cmp(&settlements[a].city_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let target = ((n as f32 * cfg.city_share).round() as u32)
        .clamp(cfg.min_cities, cfg.max_cities)
        .min(n as u32) as usize;

    let mut cities: Vec<usize> = Vec::new();
    for &candidate in &order {
        if cities.len() >= target {
            break;
        }
        if settlements[candidate].city_score < cfg.min_score_for_city {
            continue;
        }
        if far_enough_from_all(candidate, &cities, &adjacency, cfg.min_city_hops) {
            cities.push(candidate);
        }
    }

    for &city in &cities {
        settlements[city].category = Category::City;
    }

    let town_score_threshold = (0.55 * cfg.min_score_for_city).max(0.4 * max_city_score);
    for v in 0..n {
        if settlements[v].category == Category::City {
            continue;
        }
        if degrees[v] >= 2 || settlements[v].city_score >= town_score_threshold {
            settlements[v].category = Category::Town;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn village(x: f32, y: f32, suitability: f32) -> Settlement {
        Settlement {
            x,
            y,
            elevation: 0.5,
            suitability,
            island_id: 0,
            island_area: 10,
            road_degree: 0,
            second_hop_reach: 0,
            city_score: 0.0,
            category: Category::Village,
        }
    }

    fn road(a: usize, b: usize, length: f32) -> RoadSegment {
        RoadSegment {
            a,
            b,
            length,
            points: vec![(0.0, 0.0), (length, 0.0)],
        }
    }

    #[test]
    fn test_two_hop_reach_on_path_graph() {
        let adjacency = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];
        assert_eq!(two_hop_reach(0, &adjacency), 2);
        assert_eq!(two_hop_reach(1, &adjacency), 3);
    }

    #[test]
    fn test_hop_distance_within_bound() {
        let adjacency = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];
        assert_eq!(hop_distance_within(0, 3, &adjacency, 5), Some(3));
        assert_eq!(hop_distance_within(0, 3, &adjacency, 2), None);
    }

    #[test]
    fn test_classify_empty_is_noop() {
        let mut settlements: Vec<Settlement> = Vec::new();
        classify_settlements(&mut settlements, &[], &ClassifierConfig::default());
        assert!(settlements.is_empty());
    }

    #[test]
    fn test_every_degree_two_settlement_is_at_least_town() {
        let mut settlements = vec![
            village(0.0, 0.0, 0.6),
            village(10.0, 0.0, 0.6),
            village(20.0, 0.0, 0.6),
            village(30.0, 0.0, 0.6),
        ];
        let roads = vec![road(0, 1, 10.0), road(1, 2, 10.0), road(2, 3, 10.0)];
        let mut cfg = ClassifierConfig::default();
        cfg.min_cities = 1;
        cfg.max_cities = 1;
        classify_settlements(&mut settlements, &roads, &cfg);
        for s in &settlements {
            assert_ne!(s.category, Category::Village);
        }
    }

    #[test]
    fn test_city_count_within_bounds() {
        let n = 40;
        let mut settlements: Vec<Settlement> = (0..n)
            .map(|i| village(i as f32 * 20.0, 0.0, 0.5 + (i % 3) as f32 * 0.1))
            .collect();
        let roads: Vec<RoadSegment> = (0..n - 1).map(|i| road(i, i + 1, 20.0)).collect();
        let cfg = ClassifierConfig::default();
        classify_settlements(&mut settlements, &roads, &cfg);
        let city_count = settlements.iter().filter(|s| s.category == Category::City).count();
        assert!(city_count >= 1);
        assert!(city_count <= cfg.max_cities as usize);
    }

    #[test]
    fn test_cities_are_pairwise_far_enough_on_road_graph() {
        let n = 40;
        let mut settlements: Vec<Settlement> = (0..n)
            .map(|i| village(i as f32 * 15.0, 0.0, 0.9))
            .collect();
        let roads: Vec<RoadSegment> = (0..n - 1).map(|i| road(i, i + 1, 15.0)).collect();
        let adjacency = build_adjacency(n, &roads);
        let cfg = ClassifierConfig::default();
        classify_settlements(&mut settlements, &roads, &cfg);
        let cities: Vec<usize> = (0..n).filter(|&i| settlements[i].category == Category::City).collect();
        for i in 0..cities.len() {
            for j in (i + 1)..cities.len() {
                let d = hop_distance_within(cities[i], cities[j], &adjacency, cfg.min_city_hops - 1);
                assert!(d.is_none(), "cities {} and {} too close", cities[i], cities[j]);
            }
        }
    }
}
