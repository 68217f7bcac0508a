//! JSON-line driver for the combat decision core.
//!
//! Reads one world snapshot per stdin line and writes one action token per
//! stdout line. Logs go to stderr (and optionally a file) so stdout stays a
//! clean action stream.

mod config;
mod driver;
mod logging;

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use combat_ai::{CombatAi, PcgRandom, RandomSource, ThreadRandom};

/// Decide arena fighter actions from JSON snapshots on stdin
#[derive(Parser, Debug)]
#[command(name = "combat-ai")]
#[command(about = "Decide arena fighter actions from JSON snapshots", long_about = None)]
#[command(version)]
struct Cli {
    /// Strategy hint passed with every snapshot (aggressive, defensive, random)
    #[arg(short, long, default_value = "random")]
    strategy: String,

    /// TOML config file (defaults to $COMBAT_AI_CONFIG, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a deterministic random source
    #[arg(long)]
    seed: Option<u64>,

    /// Also write logs to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::init(cli.log_dir.as_deref())?;

    let config = config::resolve(cli.config.as_deref())?;
    let ai = CombatAi::new(config);

    let mut rng: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => {
            tracing::info!(seed, "using deterministic random source");
            Box::new(PcgRandom::new(seed))
        }
        None => Box::new(ThreadRandom::new()),
    };

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let stats = driver::run(&ai, &cli.strategy, rng.as_mut(), stdin, stdout)?;

    tracing::info!(
        decisions = stats.decisions,
        idle = stats.idle,
        skipped = stats.skipped,
        "input exhausted"
    );
    Ok(())
}
