//! Agent catalog loader.
//!
//! Loads agent spawn templates from RON files.

use std::path::Path;

use combat_core::AgentTemplate;

use crate::loaders::{LoadResult, read_file};

const BUNDLED_AGENTS: &str = include_str!("../../data/agents.ron");

/// Loader for agent catalogs from RON files.
pub struct AgentCatalogLoader;

impl AgentCatalogLoader {
    /// Load an agent catalog from a RON file.
    ///
    /// RON format: `Vec<AgentTemplate>`
    pub fn load(path: &Path) -> LoadResult<Vec<AgentTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid agent catalog {}: {}", path.display(), e))
    }

    /// Parse an agent catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<AgentTemplate>> {
        let templates: Vec<AgentTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse agent catalog RON: {}", e))?;
        Ok(templates)
    }
}

/// The catalog embedded from `data/agents.ron`.
pub fn bundled_agents() -> LoadResult<Vec<AgentTemplate>> {
    AgentCatalogLoader::parse(BUNDLED_AGENTS)
}
