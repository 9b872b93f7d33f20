//! World-generation constants and per-stage configuration structs.
//!
//! Defaults here match every numeric default named in the component design:
//! §4.1 noise octaves, §4.2 contrast thresholds, §4.3 erosion constants,
//! §4.4 coast threshold, §4.5 settlement sampling, §4.6 road planning, §4.7
//! classification.

/// Elevation separating plains from highland for the contrast stretch.
pub const PLAINS_THRESHOLD: f32 = 0.48;
/// Elevation separating water from land.
pub const DEFAULT_COAST_THRESHOLD: f32 = 0.35;

/// Multi-octave noise evaluator configuration (§4.1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub warp_strength: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            warp_strength: 0.08,
        }
    }
}

/// Hydraulic erosion engine configuration (§4.3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErosionConfig {
    pub iterations: u32,
    pub rainfall: f32,
    pub strength: f32,
    pub flow_exponent: f32,
    pub min_slope: f32,
    pub smoothing_iterations: u32,
    pub smoothing_blend: f32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            rainfall: 1.0,
            strength: 0.02,
            flow_exponent: 0.8,
            min_slope: 1e-4,
            smoothing_iterations: 0,
            smoothing_blend: 0.5,
        }
    }
}

/// Settlement sampler configuration (§4.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementConfig {
    pub stride: usize,
    pub coast_threshold: f32,
    pub fade_out_height: f32,
    pub island_factor_base: f32,
    pub island_factor_exponent: f32,
    pub base_chance: f32,
    pub min_distance: f32,
    pub max_settlements: usize,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            stride: 4,
            coast_threshold: DEFAULT_COAST_THRESHOLD,
            fade_out_height: 0.92,
            island_factor_base: 0.35,
            island_factor_exponent: 0.75,
            base_chance: 0.6,
            min_distance: 12.0,
            max_settlements: 400,
        }
    }
}

/// Road planner configuration (§4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadPlannerConfig {
    pub k_nearest: usize,
    pub max_distance: f32,
    pub force_mst: bool,
    pub path_factor: f32,
    pub astar_step: f32,
    pub slope_cost: f32,
    pub water_threshold: f32,
    pub water_penalty: f32,
}

impl Default for RoadPlannerConfig {
    fn default() -> Self {
        Self {
            k_nearest: 6,
            max_distance: 360.0,
            force_mst: true,
            path_factor: 1.15,
            astar_step: 1.0,
            slope_cost: 15.0,
            water_threshold: DEFAULT_COAST_THRESHOLD,
            water_penalty: 8.0,
        }
    }
}

/// Settlement classifier configuration (§4.7).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    pub city_share: f32,
    pub min_cities: usize,
    pub max_cities: usize,
    pub min_score_for_city: f32,
    pub min_city_hops: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            city_share: 0.05,
            min_cities: 5,
            max_cities: 75,
            min_score_for_city: 0.35,
            min_city_hops: 4,
        }
    }
}

impl ClassifierConfig {
    /// Validate the documented ranges (§7 "Configuration error").
    pub fn validate(&self) -> Result<(), crate::error::WorldError> {
        if self.min_cities > self.max_cities {
            return Err(crate::error::WorldError::InvalidClassifierConfig(format!(
                "minCities ({}) > maxCities ({})",
                self.min_cities, self.max_cities
            )));
        }
        if !(0.0..=1.0).contains(&self.city_share) {
            return Err(crate::error::WorldError::InvalidClassifierConfig(format!(
                "cityShare {} not in [0, 1]",
                self.city_share
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for `World::build` (§6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    /// Renderer hint only; the core pipeline never reads it. Carried through
    /// `build`/save-record round trips so the renderer sees what it asked for.
    pub use_shading: bool,
    pub enable_erosion: bool,
    pub noise: NoiseConfig,
    pub erosion: ErosionConfig,
    pub settlements: SettlementConfig,
    pub roads: RoadPlannerConfig,
    pub classifier: ClassifierConfig,
}

impl WorldConfig {
    pub fn new(seed: u64, width: usize, height: usize) -> Self {
        Self {
            seed,
            width,
            height,
            use_shading: true,
            enable_erosion: true,
            noise: NoiseConfig::default(),
            erosion: ErosionConfig::default(),
            settlements: SettlementConfig::default(),
            roads: RoadPlannerConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), crate::error::WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(crate::error::WorldError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.classifier.validate()
    }
}
