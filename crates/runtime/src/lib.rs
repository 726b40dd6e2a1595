//! Runtime orchestration for AI agents fighting a single player.
//!
//! This crate wires the coordination rules from `combat-core` into per-agent
//! controllers and a tick loop. Consumers embed [`Arena`], implement
//! [`CombatHost`] for their world, and forward player attacks, perception and
//! death notifications into it.
//!
//! Modules are organized by responsibility:
//! - [`arena`] hosts the tick loop and the single authoritative agent table
//! - [`controller`] owns each agent's state machine and is the only caller
//!   into the formation and roster
//! - [`states`] provides the built-in Guard/Alert/Attack behaviors
//! - [`api`] exposes the host contract and error types
pub mod agents;
pub mod api;
pub mod arena;
pub mod controller;
pub mod states;

pub use agents::{AgentRecord, AgentTable};
pub use api::{CombatHost, Result, RuntimeError};
pub use arena::{Arena, ArenaConfig};
pub use controller::{
    AgentController, Blackboard, CombatContext, InFlightAttack, Intent, PerceivedActor, Reaction,
    StateTuning,
};
pub use states::{AlertState, AttackState, GuardState};
