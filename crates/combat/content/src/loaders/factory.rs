//! Content factory for loading a fight's inputs from a data directory.

use std::path::{Path, PathBuf};

use combat_core::{AgentTemplate, CombatConfig};

use crate::loaders::{AgentCatalogLoader, ConfigLoader, LoadResult};

/// Loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── agents.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the agent catalog from `agents.ron`.
    pub fn load_agents(&self) -> LoadResult<Vec<AgentTemplate>> {
        AgentCatalogLoader::load(&self.data_dir.join("agents.ron"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_both_files_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "max_engagement_budget = 7\n").unwrap();
        std::fs::write(
            dir.path().join("agents.ron"),
            "[(position: (x: 0.0, y: 0.0, z: 0.0), engagement_score: 3)]",
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap().max_engagement_budget, 7);
        assert_eq!(factory.load_agents().unwrap().len(), 1);
    }

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
