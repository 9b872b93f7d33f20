//! Procedural world-generation pipeline: heightmap, islands, settlements,
//! roads and road graph, plus the game-time service. A seed and a target
//! grid size determine the whole world; the pipeline is single-threaded,
//! synchronous, and every stage is a pure function of its inputs and a
//! single PRNG stream.

pub mod classify;
pub mod config;
pub mod erosion;
pub mod error;
pub mod heightmap;
pub mod islands;
pub mod noise;
pub mod rng;
pub mod road_graph;
pub mod roads;
pub mod settlements;
pub mod time;
pub mod world;

pub use config::WorldConfig;
pub use error::WorldError;
pub use world::{TravelPath, World};
