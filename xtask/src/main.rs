//! Development tasks for Gopherland
//!
//! Usage:
//!   cargo xtask check-map [PATH]        # Validate a map against the block catalog
//!   cargo xtask simulate --ticks 600    # Run the game headless and report
//!   cargo xtask dump-config             # Write the default config as RON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gopherland::game::{Game, GameConfig, TickInput};
use gopherland::world::{load_map, BlockKind, BlockRegistry, AIR};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for Gopherland")]
struct Cli {
    /// Config file (relative paths resolve from the project root)
    #[arg(long, global = true, default_value = "data/config.ron")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a map: size, unregistered symbols, spawn placement
    CheckMap {
        /// Map file (defaults to the configured map)
        path: Option<PathBuf>,
    },
    /// Run the simulation without a window
    Simulate {
        #[arg(long, default_value_t = 600)]
        ticks: u32,
        /// Hold right the whole run
        #[arg(long)]
        right: bool,
        /// Hold left the whole run
        #[arg(long)]
        left: bool,
        /// Press jump every N ticks (held for half of them)
        #[arg(long)]
        jump_every: Option<u32>,
    },
    /// Write the default config
    DumpConfig {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let root = project_root();

    match cli.command {
        Commands::CheckMap { path } => check_map(&root, &cli.config, path),
        Commands::Simulate { ticks, right, left, jump_every } => {
            simulate(&root, &cli.config, ticks, TickInput { left, right, ..Default::default() }, jump_every)
        }
        Commands::DumpConfig { out } => dump_config(out),
    }
}

/// Get the project root directory
fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load the config, with its map path resolved against the project root
fn load_config(root: &Path, path: &Path) -> Result<GameConfig> {
    let mut config = GameConfig::load(root.join(path))
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    config.map_path = root.join(&config.map_path).to_string_lossy().to_string();
    Ok(config)
}

fn check_map(root: &Path, config_path: &Path, path: Option<PathBuf>) -> Result<()> {
    let mut config = load_config(root, config_path)?;
    if let Some(path) = path {
        config.map_path = path.to_string_lossy().to_string();
    }

    let map = load_map(&config.map_path)
        .with_context(|| format!("Failed to load map {}", config.map_path))?;
    let blocks = BlockRegistry::from_defs(config.square_size, config.blocks.clone())
        .context("Invalid block catalog")?;

    println!("Map {}: {}x{}", config.map_path, map.width(), map.height());

    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for (_, _, symbol) in map.symbols() {
        if symbol != AIR {
            *counts.entry(symbol).or_default() += 1;
        }
    }

    let mut unknown = Vec::new();
    for (&symbol, &count) in &counts {
        if blocks.is_registered(symbol) {
            let block = blocks.lookup(symbol);
            println!("  {:?} {:<16} x{}", symbol, block.name, count);
        } else if symbol != gopherland::game::SPAWN_MARKER {
            unknown.push(symbol);
        }
    }

    println!("Gold available: {}", gold_available(&counts, &blocks));

    if !unknown.is_empty() {
        anyhow::bail!("Map uses unregistered symbols: {:?}", unknown);
    }

    let game = Game::from_config(&config, map).context("Map does not make a playable game")?;
    let spawn = game.player().position;
    println!("Spawn at ({:.3}, {:.3}), grounded: {}", spawn.x, spawn.y, game.player().touching_ground);
    println!("OK");
    Ok(())
}

/// Total currency on the map, capped at `u32::MAX`
fn gold_available(counts: &BTreeMap<char, usize>, blocks: &BlockRegistry) -> u32 {
    counts
        .iter()
        .filter_map(|(&s, &n)| match blocks.lookup(s).kind {
            BlockKind::Currency(amount) => Some(amount.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))),
            _ => None,
        })
        .fold(0, u32::saturating_add)
}

fn simulate(root: &Path, config_path: &Path, ticks: u32, held: TickInput, jump_every: Option<u32>) -> Result<()> {
    let config = load_config(root, config_path)?;
    let mut game = Game::load(&config).context("Failed to start game")?;

    let mut landings = 0;
    let mut pickups = 0;
    let mut doors = 0;
    for tick in 0..ticks {
        let jump = match jump_every {
            Some(every) if every > 0 => tick % every < every / 2 + 1,
            _ => false,
        };
        game.tick(TickInput { jump, ..held });

        landings += game.events.landed.len();
        pickups += game.events.item_collected.len();
        doors += game.events.door_opened.len();
    }

    let player = game.player();
    println!("After {} ticks:", game.ticks());
    println!("  position ({:.3}, {:.3}) facing {:?}", player.position.x, player.position.y, player.direction);
    println!("  phase {:?}, velocity {:.2}", game.phase(), player.vertical_velocity);
    println!("  gold {}, keys {}", player.gold, player.keys);
    println!("  landings {}, pickups {}, doors opened {}", landings, pickups, doors);
    Ok(())
}

fn dump_config(out: Option<PathBuf>) -> Result<()> {
    let text = GameConfig::default().to_ron().context("Failed to serialize config")?;
    match out {
        Some(path) => {
            std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
