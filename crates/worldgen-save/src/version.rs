//! Save record version history.
//!
//! - v1: roads stored inline as `{a, b, length, points}` per road. Readable,
//!   never written.
//! - v2: roads stored as a flat typed-array blob (shared points buffer plus
//!   per-road metadata). Current write format.

pub const CURRENT_SAVE_VERSION: u32 = 2;
