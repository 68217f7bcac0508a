//! Config file discovery.
//!
//! Lookup order:
//! 1. `--config <path>`
//! 2. `$COMBAT_AI_CONFIG`
//! 3. `config.toml` in the platform config directory, if it exists
//!    (e.g. `~/.config/combat-ai/config.toml` on Linux)
//!
//! With none of these the built-in defaults apply. `COMBAT_AI_*` overrides
//! are applied last in every case.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use combat_ai::AiConfig;

const CONFIG_ENV: &str = "COMBAT_AI_CONFIG";
const CONFIG_FILE: &str = "config.toml";

pub fn resolve(cli_path: Option<&Path>) -> Result<AiConfig> {
    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let path = locate(cli_path, env_path, default_path());
    load(path.as_deref())
}

/// Picks the config file to read. Explicit paths win even when missing; the
/// default path only counts if present.
fn locate(
    cli_path: Option<&Path>,
    env_path: Option<PathBuf>,
    default_path: Option<PathBuf>,
) -> Option<PathBuf> {
    cli_path
        .map(Path::to_path_buf)
        .or(env_path)
        .or_else(|| default_path.filter(|path| path.is_file()))
}

fn load(path: Option<&Path>) -> Result<AiConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            AiConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => {
            tracing::debug!("No config file, using defaults");
            AiConfig::default()
        }
    };
    Ok(config.with_env_overrides())
}

fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "combat-ai")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
