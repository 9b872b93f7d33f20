//! Thin host CLI (§6 "CLI/flags surface"): seed input, grid size, erosion
//! toggle, and save/load triggers. Exit codes and environment variables are
//! not part of the core contract — this binary is a convenience wrapper
//! around `worldgen`/`worldgen-save`, not a specified interface.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use worldgen::config::WorldConfig;
use worldgen::world::World;
use worldgen_save::{file_header, record_to_world, world_to_record, SaveRecord};

#[derive(Parser)]
#[command(name = "worldgen", about = "Procedural world-generation pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a world from a seed and grid size, print a summary, and
    /// optionally write it to a save file.
    Build {
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = 256)]
        width: usize,
        #[arg(long, default_value_t = 256)]
        height: usize,
        /// Disable the erosion pass (enabled by default).
        #[arg(long)]
        no_erosion: bool,
        /// Write the built world to this save file.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Load a save file and print a summary of the world it contains.
    Load {
        path: PathBuf,
    },
    /// Load a save file and print the shortest travel path between two
    /// settlement indices.
    Path {
        path: PathBuf,
        from: usize,
        to: usize,
    },
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn print_world_summary(world: &World) {
    let cities = world
        .settlements
        .iter()
        .filter(|s| s.category == worldgen::settlements::Category::City)
        .count();
    let towns = world
        .settlements
        .iter()
        .filter(|s| s.category == worldgen::settlements::Category::Town)
        .count();
    let villages = world.settlements.len() - cities - towns;

    println!("seed:        {}", world.config.seed);
    println!("dimensions:  {}x{}", world.config.width, world.config.height);
    println!("islands:     {}", world.islands.areas.len());
    println!(
        "settlements: {} (villages {villages}, towns {towns}, cities {cities})",
        world.settlements.len()
    );
    println!("roads:       {}", world.road_graph.roads().len());
    println!("game day:    {}", world.time.total_days());
}

fn load_record(path: &PathBuf) -> Result<SaveRecord, String> {
    let bytes = fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let (_header, payload) = file_header::unwrap(&bytes)?;
    SaveRecord::decode(payload).map_err(|e| format!("failed to decode save record: {e}"))
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            seed,
            width,
            height,
            no_erosion,
            save,
        } => {
            let mut cfg = WorldConfig::new(seed, width, height);
            cfg.enable_erosion = !no_erosion;

            let world = World::build(cfg).map_err(|e| e.to_string())?;
            print_world_summary(&world);

            if let Some(path) = save {
                let record = world_to_record(&world, now_ms(), None);
                let payload = record.encode();
                let wrapped = file_header::wrap(record.version, record.created_at, &payload);
                fs::write(&path, wrapped).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
                log::info!("wrote save file to {}", path.display());
            }
            Ok(())
        }
        Command::Load { path } => {
            let record = load_record(&path)?;
            let (world, _player) = record_to_world(&record).map_err(|e| e.to_string())?;
            print_world_summary(&world);
            Ok(())
        }
        Command::Path { path, from, to } => {
            let record = load_record(&path)?;
            let (world, _player) = record_to_world(&record).map_err(|e| e.to_string())?;
            match world.shortest_path(from, to) {
                Some(travel) => {
                    println!("nodes:    {:?}", travel.nodes);
                    println!("distance: {:.2}", travel.distance);
                    println!("points:   {}", travel.polyline.len());
                }
                None => println!("no path between settlement {from} and {to}"),
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}
