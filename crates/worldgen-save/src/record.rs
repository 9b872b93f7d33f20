//! Plain-data save record types (§4.10, §6). Every field here is a plain
//! record — no renderer proxies, no references into the live `World` — so a
//! `SaveRecord` can be encoded, stored, and decoded independently of the
//! `World` that produced it.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use worldgen::settlements::Category;

use crate::version::CURRENT_SAVE_VERSION;

/// A settlement, as stored on disk: `{x,y,elevation,suitability,islandId,
/// islandArea,roadDegree,secondHopReach,cityScore,category}` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveSettlement {
    pub x: f32,
    pub y: f32,
    pub elevation: f32,
    pub suitability: f32,
    pub island_id: i32,
    pub island_area: u32,
    pub road_degree: u32,
    pub second_hop_reach: u32,
    pub city_score: f32,
    pub category: u8,
}

/// `Category::Village | Town | City` as the `u8` the save format stores.
pub fn category_to_u8(c: Category) -> u8 {
    match c {
        Category::Village => 0,
        Category::Town => 1,
        Category::City => 2,
    }
}

pub fn u8_to_category(v: u8) -> Category {
    match v {
        1 => Category::Town,
        2 => Category::City,
        _ => Category::Village,
    }
}

/// Per-road metadata entry in the version-2 flat layout: `{x1,y1,x2,y2,
/// length,aIndex,bIndex,pointsOffset,pointsCount}`. `points_offset` counts
/// point *pairs* from the start of `points_data`, not bytes or floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveRoadMeta {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub length: f32,
    pub a_index: u32,
    pub b_index: u32,
    pub points_offset: u32,
    pub points_count: u32,
}

/// Version-2 road layout: one contiguous float array of xy pairs over all
/// road polylines, plus a metadata list that slices into it. `points_data`
/// holds `2 * sum(points_count)` floats, x and y interleaved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct SaveRoadsV2 {
    pub metadata: Vec<SaveRoadMeta>,
    pub points_data: Vec<f32>,
}

/// A single polyline vertex. Kept as a named-field struct rather than a
/// tuple so every save type stays in the same flattened shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SavePoint {
    pub x: f32,
    pub y: f32,
}

/// Version-1 road layout: each road carries its own owned point list
/// inline. Readable for backward compatibility; never written (§4.10).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveRoadV1 {
    pub a: u32,
    pub b: u32,
    pub length: f32,
    pub points: Vec<SavePoint>,
}

/// Roads as stored, in either the legacy inline form or the current flat
/// form. Readers accept both; writers always emit `V2` (§4.10, §9 "Open
/// question").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum SaveRoads {
    V1(Vec<SaveRoadV1>),
    V2(SaveRoadsV2),
}

/// `{ totalDays, timeSpeed }` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveTime {
    pub total_days: u32,
    pub time_speed: u8,
}

/// Optional player placement: `{ x, y, currentSettlementIndex | null }`.
/// Not part of `World`'s owned data (§3 "Ownership") — passed through by
/// the host alongside the record it saves or loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SavePlayer {
    pub x: f32,
    pub y: f32,
    pub current_settlement_index: Option<u32>,
}

/// The full save record (§6, "Save record format (version 2)").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveRecord {
    pub version: u32,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub use_shading: bool,
    pub enable_erosion: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Contiguous little-endian-equivalent flat float buffer of length
    /// `width * height`, row-major.
    pub heightmap: Vec<f32>,
    pub settlements: Vec<SaveSettlement>,
    pub roads: SaveRoads,
    pub time: SaveTime,
    pub player: Option<SavePlayer>,
}

impl SaveRecord {
    /// Encode to the compact binary wire format.
    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Decode from the compact binary wire format.
    pub fn decode(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::decode(bytes)
    }

    pub fn is_current_version(&self) -> bool {
        self.version == CURRENT_SAVE_VERSION
    }
}
