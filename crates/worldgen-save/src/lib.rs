//! Versioned save-record codec for `worldgen` worlds (§4.10, §6).
//!
//! Heightmap as a flat float buffer, settlements as plain records, roads as
//! a version-2 flat-buffer blob (with version-1 inline roads still
//! readable). The codec never touches rendering state; it only converts
//! between `worldgen::World` and the plain-data `SaveRecord`.

pub mod codec;
pub mod file_header;
pub mod record;
pub mod record_store;
pub mod save_error;
pub mod version;

pub use codec::{record_to_world, world_to_record};
pub use record::{SaveRecord, SavePlayer};
pub use record_store::{MemoryRecordStore, RecordStore};
pub use save_error::SaveError;
pub use version::CURRENT_SAVE_VERSION;
