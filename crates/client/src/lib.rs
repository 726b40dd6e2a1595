//! Scripted arena client.
//!
//! Composition root pieces for the `arena` binary: environment-driven
//! configuration, a host that plays the world's part, and the scripted
//! fight that drives both.

pub mod config;
pub mod host;
pub mod simulation;

pub use config::ClientConfig;
pub use host::ScriptedHost;
pub use simulation::{Simulation, SimulationReport};
