//! Environment contract for the combat runtime.
//!
//! The runtime decides *what* agents should do; the host carries it out in
//! the world (animation, movement, damage). Hosts can be a game engine
//! binding, a scripted simulation, or a recording test fixture.

use combat_core::{AgentId, AttackDirection, Vec3};

/// Trait implemented by whatever owns the world the agents live in.
///
/// Every call is a notification: the runtime has already updated its own
/// bookkeeping when a hook fires.
pub trait CombatHost {
    /// Current position of the player the agents are fighting.
    fn player_position(&self) -> Vec3;

    /// `agent` joined the attack circle and the engaged set.
    fn enter_combat(&mut self, agent: AgentId);

    /// `agent` left the attack circle and returned to the idle set.
    fn leave_combat(&mut self, agent: AgentId);

    /// `agent` was admitted to attack with the given attack-budget score.
    /// The host must report completion through
    /// [`Arena::agent_attack_finished`](crate::Arena::agent_attack_finished).
    fn perform_attack(&mut self, agent: AgentId, score: u32);

    /// `agent` should parry a quick attack coming from `direction`.
    fn parry(&mut self, agent: AgentId, direction: AttackDirection);

    /// `agent` should dodge a strong attack coming from `direction`.
    fn dodge(&mut self, agent: AgentId, direction: AttackDirection);

    /// `agent` was feinted at from `direction`. Ignored by default.
    fn react_to_feint(&mut self, _agent: AgentId, _direction: AttackDirection) {}

    /// `agent` should move toward `location`.
    fn move_to(&mut self, agent: AgentId, location: Vec3);

    /// `agent` died and is no longer driven by the runtime.
    fn release(&mut self, _agent: AgentId) {}
}
