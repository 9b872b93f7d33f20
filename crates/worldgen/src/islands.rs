//! 4-connected flood-fill island labeller (§4.4).

use crate::heightmap::Heightmap;

/// Parallel array of signed island ids over cells (`-1` = water), plus
/// per-island area in cells.
#[derive(Debug, Clone, PartialEq)]
pub struct IslandMap {
    pub ids: Vec<i32>,
    pub areas: Vec<u32>,
    pub max_area: u32,
}

/// Flood-fill land cells (elevation >= `coast_threshold`) into 4-connected
/// islands using an explicit stack (iterative, no recursion).
pub fn label_islands(hm: &Heightmap, coast_threshold: f32) -> IslandMap {
    let (width, height) = (hm.width, hm.height);
    let mut ids = vec![-1_i32; width * height];
    let mut areas = Vec::new();
    let mut max_area = 0_u32;
    let mut stack: Vec<usize> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let start = hm.index(x, y);
            if ids[start] != -1 || hm.data[start] < coast_threshold {
                continue;
            }

            let island_id = areas.len() as i32;
            let mut area = 0_u32;
            ids[start] = island_id;
            stack.push(start);

            while let Some(idx) = stack.pop() {
                area += 1;
                let cx = idx % width;
                let cy = idx / width;

                let neighbours = [
                    (cx.wrapping_sub(1), cy, cx > 0),
                    (cx + 1, cy, cx + 1 < width),
                    (cx, cy.wrapping_sub(1), cy > 0),
                    (cx, cy + 1, cy + 1 < height),
                ];
                for &(nx, ny, valid) in &neighbours {
                    if !valid {
                        continue;
                    }
                    let nidx = ny * width + nx;
                    if ids[nidx] == -1 && hm.data[nidx] >= coast_threshold {
                        ids[nidx] = island_id;
                        stack.push(nidx);
                    }
                }
            }

            max_area = max_area.max(area);
            areas.push(area);
        }
    }

    IslandMap {
        ids,
        areas,
        max_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm_from(width: usize, height: usize, data: &[f32]) -> Heightmap {
        Heightmap {
            data: data.to_vec(),
            width,
            height,
        }
    }

    #[test]
    fn test_single_island() {
        #[rustfmt::skip]
        let hm = hm_from(3, 3, &[
            0.1, 0.1, 0.1,
            0.1, 0.9, 0.1,
            0.1, 0.1, 0.1,
        ]);
        let map = label_islands(&hm, 0.35);
        assert_eq!(map.ids[4], 0);
        assert_eq!(map.areas, vec![1]);
        assert_eq!(map.max_area, 1);
    }

    #[test]
    fn test_two_separate_islands_not_merged_diagonally() {
        #[rustfmt::skip]
        let hm = hm_from(2, 2, &[
            0.9, 0.1,
            0.1, 0.9,
        ]);
        let map = label_islands(&hm, 0.35);
        // Diagonal neighbours are not 4-connected, so these are two islands.
        assert_ne!(map.ids[0], map.ids[3]);
        assert_eq!(map.areas.len(), 2);
        assert!(map.areas.iter().all(|&a| a == 1));
    }

    #[test]
    fn test_connected_strip_is_one_island() {
        let hm = hm_from(5, 1, &[0.9, 0.9, 0.9, 0.9, 0.9]);
        let map = label_islands(&hm, 0.35);
        assert!(map.ids.iter().all(|&id| id == 0));
        assert_eq!(map.areas, vec![5]);
    }

    #[test]
    fn test_area_sum_matches_land_cell_count() {
        #[rustfmt::skip]
        let hm = hm_from(4, 4, &[
            0.9, 0.9, 0.1, 0.1,
            0.9, 0.1, 0.1, 0.9,
            0.1, 0.1, 0.9, 0.9,
            0.1, 0.1, 0.1, 0.9,
        ]);
        let map = label_islands(&hm, 0.35);
        let land_count = hm.data.iter().filter(|&&v| v >= 0.35).count() as u32;
        let area_sum: u32 = map.areas.iter().sum();
        assert_eq!(area_sum, land_count);
    }

    #[test]
    fn test_no_land_cells_produces_no_islands() {
        let hm = hm_from(2, 2, &[0.1, 0.1, 0.1, 0.1]);
        let map = label_islands(&hm, 0.35);
        assert!(map.areas.is_empty());
        assert!(map.ids.iter().all(|&id| id == -1));
    }
}
