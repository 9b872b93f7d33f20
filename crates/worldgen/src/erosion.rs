//! D8 flow-accumulation hydraulic erosion (§4.3).
//!
//! Each pass: D8 flow direction, a stable elevation-descending flow
//! accumulation sweep, a slope x flow^e erosion update, and optional
//! neighbourhood smoothing. Determinism hinges on sort stability: the sort
//! key is `(elevation descending, cell index ascending)` so ties never
//! reorder between runs (§9 "Tie-breaking").

use crate::config::{ErosionConfig, PLAINS_THRESHOLD};
use crate::heightmap::Heightmap;

const NEIGHBOURS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// D8 downstream target per cell, or `None` for a sink (no lower neighbour).
/// Parallel `slope` array holds the steepest drop's slope (0.0 for sinks).
struct FlowField {
    downstream: Vec<Option<usize>>,
    slope: Vec<f32>,
}

fn compute_d8_flow(hm: &Heightmap) -> FlowField {
    let (width, height) = (hm.width, hm.height);
    let mut downstream = vec![None; width * height];
    let mut slope = vec![0.0_f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let idx = hm.index(x, y);
            let h = hm.data[idx];
            let mut best_slope = 0.0_f32;
            let mut best_target = None;

            for &(dx, dy) in &NEIGHBOURS_8 {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    continue;
                }
                let nidx = hm.index(nx as usize, ny as usize);
                let nh = hm.data[nidx];
                let drop = h - nh;
                if drop <= 0.0 {
                    continue;
                }
                let distance = if dx != 0 && dy != 0 {
                    std::f32::consts::SQRT_2
                } else {
                    1.0
                };
                let s = drop / distance;
                if s > best_slope {
                    best_slope = s;
                    best_target = Some(nidx);
                }
            }

            downstream[idx] = best_target;
            slope[idx] = best_slope;
        }
    }

    FlowField { downstream, slope }
}

/// Flow accumulation: every cell starts with `rainfall`; walking cells in
/// elevation-descending order, each cell's accumulated flow is added to its
/// D8 downstream target. Descending order guarantees every upstream
/// contribution posts before its downstream cell is read.
fn accumulate_flow(hm: &Heightmap, flow: &FlowField, rainfall: f32) -> Vec<f32> {
    let n = hm.data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        hm.data[b]
            .partial_cmp(&hm.data[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut accumulated = vec![rainfall; n];
    for &idx in &order {
        if let Some(target) = flow.downstream[idx] {
            accumulated[target] += accumulated[idx];
        }
    }
    accumulated
}

fn erosion_update(hm: &mut Heightmap, flow: &FlowField, accumulated: &[f32], cfg: &ErosionConfig) {
    for idx in 0..hm.data.len() {
        let slope = flow.slope[idx];
        if slope > cfg.min_slope {
            let amount = cfg.strength * accumulated[idx].powf(cfg.flow_exponent) * slope;
            hm.data[idx] = (hm.data[idx] - amount).clamp(0.0, 1.0);
        }
    }
}

/// 9-cell mean blend, boundary cells averaging only over valid neighbours.
fn smooth_pass(hm: &mut Heightmap, blend: f32) {
    let (width, height) = (hm.width, hm.height);
    let mut next = hm.data.clone();

    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0_f32;
            let mut count = 0u32;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                        continue;
                    }
                    sum += hm.data[hm.index(nx as usize, ny as usize)];
                    count += 1;
                }
            }
            let mean = sum / count as f32;
            let idx = hm.index(x, y);
            next[idx] = hm.data[idx] * (1.0 - blend) + mean * blend;
        }
    }

    hm.data = next;
}

/// Run `cfg.iterations` erosion passes over `hm` in place, then apply one
/// final contrast stretch (§4.3).
pub fn erode(hm: &mut Heightmap, cfg: &ErosionConfig) {
    for pass in 0..cfg.iterations {
        log::debug!("erosion pass {}/{}", pass + 1, cfg.iterations);

        let flow = compute_d8_flow(hm);
        let accumulated = accumulate_flow(hm, &flow, cfg.rainfall);
        erosion_update(hm, &flow, &accumulated, cfg);

        for _ in 0..cfg.smoothing_iterations {
            smooth_pass(hm, cfg.smoothing_blend);
        }
    }

    hm.contrast_stretch(PLAINS_THRESHOLD);
}
