//! Tunables for the decision core.
//!
//! Every numeric knob of the scorer's selection step and of the state
//! machine lives in [`AiConfig`]. The scoring table itself is not
//! configurable: its bands and weights are part of the behavioral contract.
//!
//! Config is loaded from TOML (missing keys fall back to defaults, unknown
//! keys are rejected) and can be adjusted from the environment:
//!
//! - `COMBAT_AI_MAX_CHAIN` - maximum chained FSM transitions per call
//! - `COMBAT_AI_TOP_K` - pool size for top-k sampling
//! - `COMBAT_AI_NO_JITTER` - any value disables score jitter
use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Inclusive tick range for randomized timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub min: u32,
    pub max: u32,
}

impl TickRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiConfig {
    /// Maximum transitions resolved inside one decision call.
    pub max_transition_chain: u32,
    /// Lower bound of the multiplicative score jitter.
    pub jitter_min: f64,
    /// Upper bound of the multiplicative score jitter.
    pub jitter_max: f64,
    /// How many of the best legal actions the top-k variant samples from.
    pub top_k: usize,
    /// Base COMBAT dwell timer range.
    pub combat_dwell: TickRange,
    /// Extra dwell ticks per aggression point above 5.
    pub combat_dwell_aggression_bonus: f64,
    /// Distance beyond the longest skill range before COMBAT gives up.
    pub combat_slack: f64,
    /// FLEE minimum duration range.
    pub flee_duration: TickRange,
    /// Distance at which a fleeing fighter considers itself safe.
    pub flee_safe_distance: f64,
    /// HP ratio below which fleeing is forced, at riskTaking 5.
    pub flee_hp_ratio: f64,
    /// HP ratio below which healing is pre-empted.
    pub heal_entry_ratio: f64,
    /// HP ratio at which HEAL hands control back to APPROACH.
    pub heal_exit_ratio: f64,
    /// Enemy distance that aborts healing.
    pub heal_danger_range: f64,
    /// Minimum energy for a dash to count as affordable.
    pub dash_min_energy: f64,
    /// Skills at or below this cost remain usable on low energy.
    pub cheap_skill_cost: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_transition_chain: 3,
            jitter_min: 0.95,
            jitter_max: 1.05,
            top_k: 3,
            combat_dwell: TickRange::new(20, 60),
            combat_dwell_aggression_bonus: 6.0,
            combat_slack: 30.0,
            flee_duration: TickRange::new(45, 60),
            flee_safe_distance: 250.0,
            flee_hp_ratio: 0.25,
            heal_entry_ratio: 0.5,
            heal_exit_ratio: 0.7,
            heal_danger_range: 80.0,
            dash_min_energy: 10.0,
            cheap_skill_cost: 10.0,
        }
    }
}

impl AiConfig {
    /// Loads and validates a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AiConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `COMBAT_AI_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(chain) = read_env::<u32>("COMBAT_AI_MAX_CHAIN") {
            self.max_transition_chain = chain.max(1);
        }
        if let Some(k) = read_env::<usize>("COMBAT_AI_TOP_K") {
            self.top_k = k.max(1);
        }
        if env::var_os("COMBAT_AI_NO_JITTER").is_some() {
            self = self.without_jitter();
        }
        self
    }

    /// Disables score jitter, making the scorer fully deterministic.
    pub fn without_jitter(mut self) -> Self {
        self.jitter_min = 1.0;
        self.jitter_max = 1.0;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transition_chain == 0 {
            return Err(ConfigError::Invalid(
                "max_transition_chain must be at least 1".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be at least 1".into()));
        }
        if !(self.jitter_min > 0.0 && self.jitter_min <= self.jitter_max) {
            return Err(ConfigError::Invalid(format!(
                "jitter range [{}, {}] is empty or non-positive",
                self.jitter_min, self.jitter_max
            )));
        }
        for (name, range) in [
            ("combat_dwell", self.combat_dwell),
            ("flee_duration", self.flee_duration),
        ] {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "{name} min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        if self.heal_entry_ratio > self.heal_exit_ratio {
            return Err(ConfigError::Invalid(
                "heal_entry_ratio must not exceed heal_exit_ratio".into(),
            ));
        }
        Ok(())
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_transition_chain, 3);
        assert_eq!(config.combat_dwell, TickRange::new(20, 60));
        assert_eq!(config.flee_duration, TickRange::new(45, 60));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AiConfig::from_toml_str("top_k = 5\ncombat_slack = 45.0\n").unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.combat_slack, 45.0);
        assert_eq!(config.jitter_min, 0.95);
    }

    #[test]
    fn nested_tick_ranges_parse() {
        let config = AiConfig::from_toml_str("[flee_duration]\nmin = 10\nmax = 12\n").unwrap();
        assert_eq!(config.flee_duration, TickRange::new(10, 12));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AiConfig::from_toml_str("max_chain = 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let err = AiConfig::from_toml_str("jitter_min = 1.2\njitter_max = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AiConfig::from_toml_str("[combat_dwell]\nmin = 70\nmax = 20\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_transition_chain = 5").unwrap();

        let config = AiConfig::load(file.path()).unwrap();
        assert_eq!(config.max_transition_chain, 5);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AiConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn without_jitter_pins_range() {
        let config = AiConfig::default().without_jitter();
        assert_eq!((config.jitter_min, config.jitter_max), (1.0, 1.0));
        assert!(config.validate().is_ok());
    }
}
