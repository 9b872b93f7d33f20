//! Heightmap builder: radial island mask + contrast stretch (§4.2).

use crate::config::{NoiseConfig, PLAINS_THRESHOLD};
use crate::noise::NoiseField;

/// Dense row-major elevation grid. Every cell is finite; after finalisation
/// every cell is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Heightmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let idx = self.index(x, y);
        self.data[idx] = v;
    }

    /// Sample elevation at the centre of the cell containing `(wx, wy)` in
    /// cell units; clamps to grid bounds.
    pub fn sample_at(&self, wx: f32, wy: f32) -> f32 {
        let x = (wx as isize).clamp(0, self.width as isize - 1) as usize;
        let y = (wy as isize).clamp(0, self.height as isize - 1) as usize;
        self.get(x, y)
    }

    /// Smoothstep curve `3t^2 - 2t^3`.
    fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    /// Contrast stretch above `threshold` (§4.2/§4.3). Remaps the
    /// min/max range of cells above `threshold` via a smoothstep curve onto
    /// `[threshold, 1.0]`; cells at or below `threshold` are untouched. If
    /// the range is degenerate (no cells above threshold, or min == max),
    /// the stretch is skipped.
    pub fn contrast_stretch(&mut self, threshold: f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.data {
            if v > threshold {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if !min.is_finite() || !max.is_finite() || max <= min {
            return;
        }
        let range = max - min;
        for v in &mut self.data {
            if *v > threshold {
                let t = (*v - min) / range;
                let eased = Self::smoothstep(t);
                *v = threshold + eased * (1.0 - threshold);
            }
        }
    }
}

/// Build a heightmap from a seed via domain-warped noise, a radial island
/// mask, and one contrast stretch. This is the `heightmap` stage of the
/// pipeline in §2 ("Data flow").
pub fn build_heightmap(
    seed: u64,
    width: usize,
    height: usize,
    noise_cfg: &NoiseConfig,
) -> Heightmap {
    let field = NoiseField::new(seed);
    let mut hm = Heightmap::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let nx = x as f32 / width as f32;
            let ny = y as f32 / height as f32;

            let raw = field.sample_warped(nx, ny, noise_cfg);

            let dx = nx - 0.5;
            let dy = ny - 0.5;
            let d = (dx * dx + dy * dy).sqrt();
            let mask = (1.0 - d).max(0.0).powf(1.2);

            let v = (raw * mask).clamp(0.0, 1.0);
            hm.set(x, y, v);
        }
    }

    hm.contrast_stretch(PLAINS_THRESHOLD);
    hm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightmap_values_in_range() {
        let cfg = NoiseConfig::default();
        let hm = build_heightmap(1, 64, 64, &cfg);
        for &v in &hm.data {
            assert!(v.is_finite());
            assert!((0.0..=1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn test_heightmap_deterministic() {
        let cfg = NoiseConfig::default();
        let a = build_heightmap(42, 32, 32, &cfg);
        let b = build_heightmap(42, 32, 32, &cfg);
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn test_heightmap_length_matches_dims() {
        let cfg = NoiseConfig::default();
        let hm = build_heightmap(1, 17, 23, &cfg);
        assert_eq!(hm.data.len(), 17 * 23);
    }

    #[test]
    fn test_radial_mask_favours_centre() {
        // The island mask pushes elevation toward zero far from centre; a
        // large-enough grid should show some cells near 0 at the corners.
        let cfg = NoiseConfig::default();
        let hm = build_heightmap(5, 128, 128, &cfg);
        let corner = hm.get(0, 0);
        assert!(corner < 0.5, "expected low elevation at corner: {corner}");
    }

    #[test]
    fn test_contrast_stretch_skips_degenerate_range() {
        let mut hm = Heightmap::new(2, 2);
        hm.data = vec![0.1, 0.2, 0.3, 0.4];
        let before = hm.data.clone();
        hm.contrast_stretch(0.48);
        assert_eq!(hm.data, before);
    }

    #[test]
    fn test_contrast_stretch_leaves_low_cells_unchanged() {
        let mut hm = Heightmap::new(1, 2);
        hm.data = vec![0.1, 0.9];
        hm.contrast_stretch(0.48);
        assert_eq!(hm.data[0], 0.1);
    }
}
