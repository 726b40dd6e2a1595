//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use combat_runtime::ArenaConfig;

/// Configuration for one scripted fight.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// TOML combat configuration; the bundled one is used when unset.
    pub combat_config: Option<PathBuf>,
    /// RON agent catalog; the bundled one is used when unset.
    pub agent_catalog: Option<PathBuf>,
    pub ticks: u32,
    pub seed: u64,
    pub tick_seconds: f32,
}

impl ClientConfig {
    pub const DEFAULT_TICKS: u32 = 600;
    pub const DEFAULT_TICK_SECONDS: f32 = 0.05;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_CONFIG` - Path to a combat config TOML (default: bundled)
    /// - `AGENT_CATALOG` - Path to an agent catalog RON (default: bundled)
    /// - `SIM_TICKS` - Number of ticks to simulate (default: 600)
    /// - `SIM_SEED` - RNG seed for the arena and the scripted player
    /// - `SIM_TICK_SECONDS` - Seconds per tick (default: 0.05)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.combat_config = lookup("COMBAT_CONFIG").map(PathBuf::from);
        config.agent_catalog = lookup("AGENT_CATALOG").map(PathBuf::from);

        if let Some(ticks) = parse::<u32>(&lookup, "SIM_TICKS") {
            config.ticks = ticks;
        }
        if let Some(seed) = parse::<u64>(&lookup, "SIM_SEED") {
            config.seed = seed;
        }
        if let Some(seconds) = parse::<f32>(&lookup, "SIM_TICK_SECONDS") {
            if seconds.is_finite() && seconds > 0.0 {
                config.tick_seconds = seconds;
            }
        }

        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            combat_config: None,
            agent_catalog: None,
            ticks: Self::DEFAULT_TICKS,
            seed: ArenaConfig::DEFAULT_RNG_SEED,
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}
