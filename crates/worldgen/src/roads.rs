//! Road planner: k-nearest candidates, Kruskal MST, redundancy filter,
//! per-edge A* path refinement over the heightmap (§4.6).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::RoadPlannerConfig;
use crate::heightmap::Heightmap;
use crate::settlements::Settlement;

/// A planned road between two settlements. `a`/`b` index into the
/// settlement list; `points` is an ordered polyline from `a` to `b` whose
/// measured length equals `length`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub a: usize,
    pub b: usize,
    pub length: f32,
    pub points: Vec<(f32, f32)>,
}

fn polyline_length(points: &[(f32, f32)]) -> f32 {
    points
        .windows(2)
        .map(|w| {
            let (x1, y1) = w[0];
            let (x2, y2) = w[1];
            ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
        })
        .sum()
}

fn straight_line_distance(settlements: &[Settlement], a: usize, b: usize) -> f32 {
    settlements[a].distance(&settlements[b])
}

/// Undirected candidate edge between two settlement indices with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    a: usize,
    b: usize,
    dist: f32,
}

/// For each settlement, its `k` nearest neighbours within `max_distance`,
/// deduplicated into undirected edges (each unordered pair appears once).
fn candidate_edges(settlements: &[Settlement], cfg: &RoadPlannerConfig) -> Vec<Candidate> {
    let n = settlements.len();
    let mut edges: Vec<Candidate> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for i in 0..n {
        let mut neighbours: Vec<(usize, f32)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, straight_line_distance(settlements, i, j)))
            .filter(|&(_, d)| d <= cfg.max_distance)
            .collect();
        neighbours.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        neighbours.truncate(cfg.k_nearest);

        for (j, d) in neighbours {
            let (a, b) = if i < j { (i, j) } else { (j, i) };
            if seen.insert((a, b)) {
                edges.push(Candidate { a, b, dist: d });
            }
        }
    }

    edges.sort_by(|x, y| {
        x.dist
            .partial_cmp(&y.dist)
            .unwrap_or(Ordering::Equal)
            .then((x.a, x.b).cmp(&(y.a, y.b)))
    });
    edges
}

/// Union-find with path compression and union-by-rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

fn kruskal_mst(candidates: &[Candidate], n: usize) -> Vec<Candidate> {
    let mut uf = UnionFind::new(n);
    let mut mst = Vec::new();
    for &c in candidates {
        if uf.union(c.a, c.b) {
            mst.push(c);
        }
    }
    mst
}

/// Incremental adjacency for the redundancy filter's Dijkstra queries:
/// weighted by current path length (straight-line until refined).
struct IncrementalAdjacency {
    adjacency: Vec<Vec<(usize, f32)>>,
}

impl IncrementalAdjacency {
    fn new(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
        }
    }

    fn add_edge(&mut self, a: usize, b: usize, weight: f32) {
        self.adjacency[a].push((b, weight));
        self.adjacency[b].push((a, weight));
    }

    /// Dijkstra shortest path distance between `start` and `goal`, or
    /// `f32::INFINITY` if unreachable.
    fn shortest_distance(&self, start: usize, goal: usize) -> f32 {
        if start == goal {
            return 0.0;
        }
        let n = self.adjacency.len();
        let mut dist = vec![f32::INFINITY; n];
        dist[start] = 0.0;
        let mut heap: BinaryHeap<DijkstraNode> = BinaryHeap::new();
        heap.push(DijkstraNode { cost: 0.0, node: start });
        let mut visited = vec![false; n];

        while let Some(DijkstraNode { cost, node }) = heap.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            if node == goal {
                return cost;
            }
            for &(next, weight) in &self.adjacency[node] {
                if visited[next] {
                    continue;
                }
                let next_cost = cost + weight;
                if next_cost < dist[next] {
                    dist[next] = next_cost;
                    heap.push(DijkstraNode { cost: next_cost, node: next });
                }
            }
        }
        f32::INFINITY
    }
}

/// Min-heap node; `Ord` is reversed on `cost` so `BinaryHeap` (a max-heap)
/// pops the smallest cost first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DijkstraNode {
    cost: f32,
    node: usize,
}

impl Eq for DijkstraNode {}

impl Ord for DijkstraNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then(other.node.cmp(&self.node))
    }
}

impl PartialOrd for DijkstraNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* costs must be `Ord`, so real-valued step costs are quantised to
/// fixed-point millis before reaching `pathfinding::prelude::astar`.
fn quantize(cost: f32) -> u32 {
    (cost.max(0.0) * 1000.0).round() as u32
}

const ASTAR_NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Step cost from elevation `h` to `h2` over a step of length `base`.
fn step_cost(h: f32, h2: f32, base: f32, cfg: &RoadPlannerConfig) -> f32 {
    let slope_term = (h2 - h).abs() * cfg.slope_cost;
    let water_term = if h < cfg.water_threshold || h2 < cfg.water_threshold {
        cfg.water_penalty
    } else {
        0.0
    };
    base * (1.0 + slope_term + water_term)
}

/// Weighted A* over a coarse grid of `step`-sized cells between the grid
/// cells containing `start`/`goal`, via `pathfinding::prelude::astar`.
/// Returns the reconstructed polyline with its endpoints snapped to the
/// exact settlement coordinates, or `None` if no path is found.
fn astar_refine(
    hm: &Heightmap,
    start: (f32, f32),
    goal: (f32, f32),
    cfg: &RoadPlannerConfig,
) -> Option<Vec<(f32, f32)>> {
    let step = cfg.astar_step.max(0.001);
    let to_cell =
        |p: (f32, f32)| -> (i64, i64) { ((p.0 / step).round() as i64, (p.1 / step).round() as i64) };
    let in_bounds = |cell: (i64, i64)| -> bool {
        let wx = cell.0 as f32 * step;
        let wy = cell.1 as f32 * step;
        wx >= 0.0 && wy >= 0.0 && (wx as usize) < hm.width && (wy as usize) < hm.height
    };
    let elevation_at =
        |cell: (i64, i64)| -> f32 { hm.sample_at(cell.0 as f32 * step, cell.1 as f32 * step) };

    let start_cell = to_cell(start);
    let goal_cell = to_cell(goal);
    if !in_bounds(start_cell) || !in_bounds(goal_cell) {
        return None;
    }

    let (path, _cost) = pathfinding::prelude::astar(
        &start_cell,
        |&cell| {
            let h = elevation_at(cell);
            ASTAR_NEIGHBOURS
                .iter()
                .filter_map(move |&(dx, dy)| {
                    let next = (cell.0 + dx, cell.1 + dy);
                    if !in_bounds(next) {
                        return None;
                    }
                    let h2 = elevation_at(next);
                    let base = if dx != 0 && dy != 0 {
                        step * std::f32::consts::SQRT_2
                    } else {
                        step
                    };
                    Some((next, quantize(step_cost(h, h2, base, cfg))))
                })
                .collect::<Vec<_>>()
        },
        |&cell| {
            let wx = cell.0 as f32 * step;
            let wy = cell.1 as f32 * step;
            quantize(((goal.0 - wx).powi(2) + (goal.1 - wy).powi(2)).sqrt())
        },
        |&cell| cell == goal_cell,
    )?;

    let mut points: Vec<(f32, f32)> = path.iter().map(|&(cx, cy)| (cx as f32 * step, cy as f32 * step)).collect();
    if let Some(first) = points.first_mut() {
        *first = start;
    }
    if let Some(last) = points.last_mut() {
        *last = goal;
    }
    Some(points)
}

/// Plan the road network: candidate edges, Kruskal MST, redundancy filter,
/// A* path refinement, falling back to a straight two-point polyline when
/// refinement fails (§4.6).
pub fn plan_roads(
    hm: &Heightmap,
    settlements: &[Settlement],
    cfg: &RoadPlannerConfig,
) -> Vec<RoadSegment> {
    let n = settlements.len();
    if n < 2 {
        return Vec::new();
    }

    let candidates = candidate_edges(settlements, cfg);

    let mst_edges = if cfg.force_mst {
        kruskal_mst(&candidates, n)
    } else {
        Vec::new()
    };

    let mut admitted: Vec<Candidate> = Vec::new();
    let mut admitted_pairs = std::collections::HashSet::new();
    let mut adjacency = IncrementalAdjacency::new(n);

    for &c in &mst_edges {
        admitted.push(c);
        admitted_pairs.insert((c.a, c.b));
        adjacency.add_edge(c.a, c.b, c.dist);
    }

    for &c in &candidates {
        if admitted_pairs.contains(&(c.a, c.b)) {
            continue;
        }
        let current = adjacency.shortest_distance(c.a, c.b);
        if current > c.dist * cfg.path_factor {
            admitted.push(c);
            admitted_pairs.insert((c.a, c.b));
            adjacency.add_edge(c.a, c.b, c.dist);
        }
    }

    admitted.sort_by(|x, y| (x.a, x.b).cmp(&(y.a, y.b)));

    admitted
        .into_iter()
        .map(|c| {
            let start = (settlements[c.a].x, settlements[c.a].y);
            let goal = (settlements[c.b].x, settlements[c.b].y);
            let points = astar_refine(hm, start, goal, cfg).unwrap_or_else(|| vec![start, goal]);
            let length = polyline_length(&points);
            RoadSegment {
                a: c.a,
                b: c.b,
                length,
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoadPlannerConfig;

    fn flat_heightmap(width: usize, height: usize, v: f32) -> Heightmap {
        let mut hm = Heightmap::new(width, height);
        hm.data = vec![v; width * height];
        hm
    }

    fn settlement_at(x: f32, y: f32) -> Settlement {
        Settlement {
            x,
            y,
            elevation: 0.5,
            suitability: 0.5,
            island_id: 0,
            island_area: 1,
            road_degree: 0,
            second_hop_reach: 0,
            city_score: 0.0,
            category: crate::settlements::Category::Village,
        }
    }

    #[test]
    fn test_union_find_path_compression_and_union() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(1, 2));
        assert!(!uf.union(0, 2));
        assert_eq!(uf.find(0), uf.find(2));
        assert_ne!(uf.find(0), uf.find(3));
    }

    #[test]
    fn test_no_roads_for_fewer_than_two_settlements() {
        let hm = flat_heightmap(16, 16, 0.5);
        let settlements = vec![settlement_at(1.0, 1.0)];
        let cfg = RoadPlannerConfig::default();
        let roads = plan_roads(&hm, &settlements, &cfg);
        assert!(roads.is_empty());
    }

    #[test]
    fn test_two_settlements_connected_by_one_road() {
        let hm = flat_heightmap(32, 32, 0.5);
        let settlements = vec![settlement_at(2.0, 2.0), settlement_at(20.0, 20.0)];
        let cfg = RoadPlannerConfig::default();
        let roads = plan_roads(&hm, &settlements, &cfg);
        assert_eq!(roads.len(), 1);
        assert_eq!(roads[0].a, 0);
        assert_eq!(roads[0].b, 1);
    }

    #[test]
    fn test_road_length_matches_measured_polyline() {
        let hm = flat_heightmap(32, 32, 0.5);
        let settlements = vec![settlement_at(2.0, 2.0), settlement_at(20.0, 20.0)];
        let cfg = RoadPlannerConfig::default();
        let roads = plan_roads(&hm, &settlements, &cfg);
        let r = &roads[0];
        assert!((r.length - polyline_length(&r.points)).abs() < 1e-3);
    }

    #[test]
    fn test_no_duplicate_unordered_pairs() {
        let hm = flat_heightmap(64, 64, 0.5);
        let settlements = vec![
            settlement_at(2.0, 2.0),
            settlement_at(10.0, 2.0),
            settlement_at(2.0, 10.0),
            settlement_at(10.0, 10.0),
        ];
        let cfg = RoadPlannerConfig::default();
        let roads = plan_roads(&hm, &settlements, &cfg);
        let mut pairs = std::collections::HashSet::new();
        for r in &roads {
            assert!(pairs.insert((r.a, r.b)), "duplicate pair ({}, {})", r.a, r.b);
        }
    }

    #[test]
    fn test_astar_falls_back_when_out_of_bounds() {
        let hm = flat_heightmap(8, 8, 0.5);
        let cfg = RoadPlannerConfig::default();
        let result = astar_refine(&hm, (1.0, 1.0), (1000.0, 1000.0), &cfg);
        assert!(result.is_none());
    }
}
