//! Road graph service: adjacency built once from the final road list,
//! Dijkstra shortest path, and polyline reconstruction (§4.8).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::roads::RoadSegment;
use crate::settlements::Settlement;

/// Adjacency triple: neighbour settlement index, edge length, index into
/// the original road list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacencyEntry {
    pub neighbour: usize,
    pub length: f32,
    pub road_index: usize,
}

/// Immutable road graph built once from the final road list. Safe to share
/// for concurrent read-only shortest-path queries.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    adjacency: Vec<Vec<AdjacencyEntry>>,
    road_index_by_pair: HashMap<(usize, usize), usize>,
    roads: Vec<RoadSegment>,
}

/// The result of a shortest-path query: node sequence and total distance.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub nodes: Vec<usize>,
    pub distance: f32,
}

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

impl RoadGraph {
    /// Build the adjacency list and the `{a,b} -> road index` map from the
    /// final road list. `settlement_count` bounds the adjacency array even
    /// if some settlements have no incident roads.
    pub fn build(settlement_count: usize, roads: Vec<RoadSegment>) -> Self {
        let mut adjacency = vec![Vec::new(); settlement_count];
        let mut road_index_by_pair = HashMap::new();

        for (road_index, road) in roads.iter().enumerate() {
            adjacency[road.a].push(AdjacencyEntry {
                neighbour: road.b,
                length: road.length,
                road_index,
            });
            adjacency[road.b].push(AdjacencyEntry {
                neighbour: road.a,
                length: road.length,
                road_index,
            });
            let key = (road.a.min(road.b), road.a.max(road.b));
            road_index_by_pair.insert(key, road_index);
        }

        Self {
            adjacency,
            road_index_by_pair,
            roads,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbours(&self, node: usize) -> &[AdjacencyEntry] {
        &self.adjacency[node]
    }

    pub fn road_between(&self, a: usize, b: usize) -> Option<usize> {
        self.road_index_by_pair.get(&(a.min(b), a.max(b))).copied()
    }

    pub fn roads(&self) -> &[RoadSegment] {
        &self.roads
    }

    /// Dijkstra shortest path from `start` to `goal` with a binary min-heap
    /// and visited bitmap, terminating as soon as the target is popped.
    /// `None` when either endpoint is out of range or the target is
    /// unreachable.
    pub fn shortest_path(&self, start: usize, goal: usize) -> Option<PathResult> {
        let n = self.node_count();
        if start >= n || goal >= n {
            return None;
        }
        if start == goal {
            return Some(PathResult {
                nodes: vec![start],
                distance: 0.0,
            });
        }

        let mut dist = vec![f32::INFINITY; n];
        let mut prev = vec![None; n];
        let mut visited = vec![false; n];
        dist[start] = 0.0;

        let mut heap = BinaryHeap::new();
        heap.push(DijkstraNode { cost: 0.0, node: start });

        while let Some(DijkstraNode { cost, node }) = heap.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;

            if node == goal {
                let mut nodes = vec![goal];
                let mut current = goal;
                while let Some(p) = prev[current] {
                    nodes.push(p);
                    current = p;
                }
                nodes.reverse();
                return Some(PathResult { nodes, distance: cost });
            }

            for entry in &self.adjacency[node] {
                if visited[entry.neighbour] {
                    continue;
                }
                let next_cost = cost + entry.length;
                if next_cost < dist[entry.neighbour] {
                    dist[entry.neighbour] = next_cost;
                    prev[entry.neighbour] = Some(node);
                    heap.push(DijkstraNode {
                        cost: next_cost,
                        node: entry.neighbour,
                    });
                }
            }
        }

        None
    }

    /// Reconstruct the polyline for a node sequence: for each consecutive
    /// pair, orient the stored road polyline so it starts at the current
    /// node, then append all points but the first. A single-node path
    /// collapses to the settlement's coordinate.
    pub fn reconstruct_polyline(&self, nodes: &[usize], settlements: &[Settlement]) -> Vec<(f32, f32)> {
        if nodes.len() <= 1 {
            return match nodes.first() {
                Some(&n) => vec![(settlements[n].x, settlements[n].y)],
                None => Vec::new(),
            };
        }

        let mut polyline = vec![(settlements[nodes[0]].x, settlements[nodes[0]].y)];

        for window in nodes.windows(2) {
            let (from, to) = (window[0], window[1]);
            let road_index = match self.road_between(from, to) {
                Some(idx) => idx,
                None => continue,
            };
            let road = &self.roads[road_index];
            let oriented: Vec<(f32, f32)> = if road.a == from {
                road.points.clone()
            } else {
                road.points.iter().rev().copied().collect()
            };
            polyline.extend(oriented.into_iter().skip(1));
        }

        polyline
    }
}
