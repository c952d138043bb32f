//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use descent_core::PlayerClass;

/// Headless Descent run.
#[derive(Clone, Debug, Parser)]
#[command(name = "descent", version, about)]
pub struct Args {
    /// RNG seed; a random one is drawn when absent.
    #[arg(long, env = "DESCENT_SEED")]
    pub seed: Option<u64>,

    /// Starting class: fighter, rogue or guardian.
    #[arg(long, default_value = "fighter", value_parser = parse_class)]
    pub class: PlayerClass,

    /// Directory holding config.toml and enemies.ron.
    #[arg(long, env = "CONTENT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Balance config file, overriding the data directory's.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enemy catalog file, overriding the data directory's.
    #[arg(long)]
    pub enemies: Option<PathBuf>,

    /// Stop once this many rooms are cleared.
    #[arg(long, default_value_t = 50)]
    pub max_rooms: u32,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Render a battle frame every N ticks.
    #[arg(long, default_value_t = 20)]
    pub frame_every: u64,
}

fn parse_class(value: &str) -> Result<PlayerClass, String> {
    value
        .parse()
        .map_err(|_| format!("unknown class '{value}' (fighter, rogue, guardian)"))
}
