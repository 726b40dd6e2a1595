//! Data-driven combat content and loaders.
//!
//! This crate reads the host-tunable inputs of a fight from files:
//! - Combat tuning (budgets, slot radius, predictor settings) from TOML
//! - Agent catalogs (spawn positions, guard posts, scores) from RON
//!
//! A default data set is embedded at compile time so tools can run without
//! a data directory.
//!
//! All loaders deserialize combat-core types directly through serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AgentCatalogLoader, ConfigLoader, ContentFactory, LoadResult, bundled_agents, bundled_config,
};
