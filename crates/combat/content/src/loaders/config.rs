//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

const BUNDLED_CONFIG: &str = include_str!("../../data/config.toml");

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a [`CombatConfig`] from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid combat config {}: {}", path.display(), e))
    }

    /// Parse and validate a [`CombatConfig`] from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

/// The configuration embedded from `data/config.toml`.
pub fn bundled_config() -> LoadResult<CombatConfig> {
    ConfigLoader::parse(BUNDLED_CONFIG)
}
