//! Deterministic melee-coordination logic shared by the runtime and tools.
//!
//! `combat-core` defines the canonical rules for how a group of AI agents
//! engages a single player: which agents may stand around the player, how
//! much attack pressure may be in flight at once, and how the player's attack
//! habits are learned. Nothing here owns agents; every subsystem refers to
//! them through [`AgentId`] handles into the runtime's authoritative table.
//!
//! - [`formation`] hosts the eight-slot attack circle and its two budgets
//! - [`roster`] tracks idle/engaged agents and predicts the next player attack
//! - [`attack`] defines the 27-value attack id encoding
pub mod agent;
pub mod attack;
pub mod config;
pub mod error;
pub mod formation;
pub mod roster;
pub mod types;

pub use agent::{Agent, AgentTemplate, AttackProfile};
pub use attack::{AttackDirection, AttackId, AttackType, PlayerAttack};
pub use config::{CombatConfig, ConfigError};
pub use error::{CombatError, ErrorSeverity};
pub use formation::{Budget, CircleSlot, Formation, FormationError, Slot, SlotOccupant};
pub use roster::{
    AttackHistory, AttackNotice, AttackPredictor, FrequencyTable, PatternSignals, Prediction,
    PredictionSource, RecencyWindow, Roster, RosterError,
};
pub use types::{AgentId, Vec3};
