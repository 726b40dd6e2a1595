//! Scripted arena binary.
//!
//! Composition root that assembles:
//! 1. Configuration from the environment (and an optional `.env`)
//! 2. Combat tuning and the agent catalog, from files or the bundled data
//! 3. The arena with a scripted host, run for a fixed number of ticks
//!
//! # Examples
//!
//! ```bash
//! SIM_TICKS=1200 RUST_LOG=combat_runtime=debug cargo run -p combat-client
//! ```

use anyhow::{Context, Result};

use combat_client::{ClientConfig, Simulation};
use combat_content::{AgentCatalogLoader, ConfigLoader, bundled_agents, bundled_config};
use combat_runtime::ArenaConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();
    tracing::info!("Starting arena simulation");
    tracing::info!("Ticks: {} x {}s", config.ticks, config.tick_seconds);
    tracing::info!("Seed: {}", config.seed);

    // 2. Load content
    let combat = match &config.combat_config {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("loading combat config {}", path.display()))?,
        None => bundled_config().context("loading bundled combat config")?,
    };
    let templates = match &config.agent_catalog {
        Some(path) => AgentCatalogLoader::load(path)
            .with_context(|| format!("loading agent catalog {}", path.display()))?,
        None => bundled_agents().context("loading bundled agent catalog")?,
    };
    tracing::info!(
        "Loaded {} agents (engagement budget {}, attack budget {})",
        templates.len(),
        combat.max_engagement_budget,
        combat.max_attack_budget
    );

    // 3. Run
    let arena_config = ArenaConfig::new(combat).with_rng_seed(config.seed);
    let simulation = Simulation::new(arena_config, &templates, config.tick_seconds, config.ticks)
        .context("building arena")?;
    let report = simulation.run(config.ticks);

    tracing::info!(
        "Player swung {} times; agents attacked {} times",
        report.player_attacks,
        report.agent_attacks
    );
    tracing::info!(
        "Reactions: {} parries, {} dodges, {} feints",
        report.parries,
        report.dodges,
        report.feints
    );
    match report.prediction_accuracy() {
        Some(accuracy) => tracing::info!(
            "Predictions: {}/{} correct ({:.0}%)",
            report.correct_predictions,
            report.predictions,
            accuracy * 100.0
        ),
        None => tracing::info!("No predictions were made"),
    }
    tracing::info!(
        "Peak engaged agents: {}, deaths: {}",
        report.peak_engaged,
        report.deaths
    );

    Ok(())
}
