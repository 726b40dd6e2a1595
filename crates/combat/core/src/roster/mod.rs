//! Combat roster: which registered agents are idle and which are engaged,
//! plus the player-attack predictor fed by attacks against engaged agents.
//!
//! Every registered agent is in exactly one of the two sets. The roster only
//! stores [`AgentId`] handles; agent data is reached through the [`Agent`]
//! trait for the duration of a call.

mod error;
mod frequency;
mod history;
mod predictor;

pub use error::RosterError;
pub use frequency::FrequencyTable;
pub use history::AttackHistory;
pub use predictor::{
    AttackPredictor, PatternSignals, Prediction, PredictionSource, RecencyWindow,
};

use std::collections::BTreeSet;

use rand::Rng;

use crate::agent::Agent;
use crate::attack::{AttackId, PlayerAttack};
use crate::config::CombatConfig;
use crate::types::AgentId;

/// An attack against an engaged agent that its controller should react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackNotice {
    pub target: AgentId,
    pub attack: AttackId,
}

/// Idle/engaged partition of registered agents and the attack predictor.
#[derive(Clone, Debug)]
pub struct Roster {
    idle: BTreeSet<AgentId>,
    engaged: BTreeSet<AgentId>,
    predictor: AttackPredictor,
}

impl Roster {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            idle: BTreeSet::new(),
            engaged: BTreeSet::new(),
            predictor: AttackPredictor::new(config.history_capacity, config.history_weight),
        }
    }

    /// Adds `agent` to the idle set unless it is already registered.
    /// Returns whether it was inserted.
    pub fn register_agent(&mut self, agent: AgentId) -> bool {
        if self.is_registered(agent) {
            return false;
        }
        self.idle.insert(agent)
    }

    /// Removes `agent` from whichever set holds it.
    pub fn remove_agent(&mut self, agent: AgentId) -> Result<(), RosterError> {
        if self.engaged.remove(&agent) || self.idle.remove(&agent) {
            return Ok(());
        }
        tracing::error!(
            "Agent {} requesting removal from the roster is not registered",
            agent
        );
        Err(RosterError::NotRegistered { agent })
    }

    /// Checks whether `agent` may move from idle to engaged.
    pub fn can_join_combat(&self, agent: &impl Agent) -> Result<(), RosterError> {
        let id = agent.id();
        if agent.is_dead() {
            return Err(RosterError::AgentDead { agent: id });
        }
        if agent.is_in_combat() || self.engaged.contains(&id) {
            return Err(RosterError::AlreadyEngaged { agent: id });
        }
        if !self.idle.contains(&id) {
            return Err(RosterError::NotRegistered { agent: id });
        }
        Ok(())
    }

    /// Moves `agent` from idle to engaged and fires its enter-combat hook.
    pub fn have_agent_join_combat(&mut self, agent: &mut impl Agent) -> Result<(), RosterError> {
        self.can_join_combat(agent)?;
        let id = agent.id();
        self.idle.remove(&id);
        self.engaged.insert(id);
        agent.join_combat();
        tracing::debug!("Agent {} joined combat ({} engaged)", id, self.engaged.len());
        Ok(())
    }

    /// Checks whether `agent` may move from engaged back to idle.
    pub fn can_flee_combat(&self, agent: &impl Agent) -> Result<(), RosterError> {
        let id = agent.id();
        if agent.is_dead() {
            return Err(RosterError::AgentDead { agent: id });
        }
        if !self.is_registered(id) {
            return Err(RosterError::NotRegistered { agent: id });
        }
        if !agent.is_in_combat() || !self.engaged.contains(&id) || self.idle.contains(&id) {
            return Err(RosterError::NotEngaged { agent: id });
        }
        Ok(())
    }

    /// Moves `agent` from engaged to idle and fires its leave-combat hook.
    pub fn have_agent_flee_combat(&mut self, agent: &mut impl Agent) -> Result<(), RosterError> {
        self.can_flee_combat(agent)?;
        let id = agent.id();
        self.engaged.remove(&id);
        self.idle.insert(id);
        agent.leave_combat();
        tracing::debug!("Agent {} fled combat ({} engaged)", id, self.engaged.len());
        Ok(())
    }

    /// Feeds a player attack into the predictor.
    ///
    /// Attacks are ignored while nobody is engaged. Returns a notice when the
    /// attack targets an engaged agent, so its controller can react.
    pub fn record_player_attack(&mut self, attack: &PlayerAttack) -> Option<AttackNotice> {
        if self.engaged.is_empty() {
            return None;
        }

        let id = attack.id();
        tracing::debug!("Player is attacking {} with {}", attack.target, id);
        self.predictor.observe(id);

        self.engaged.contains(&attack.target).then_some(AttackNotice {
            target: attack.target,
            attack: id,
        })
    }

    /// See [`AttackPredictor::predict`].
    pub fn predict_next_attack<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Prediction> {
        self.predictor.predict(rng)
    }

    // ===== queries =====

    pub fn is_registered(&self, agent: AgentId) -> bool {
        self.idle.contains(&agent) || self.engaged.contains(&agent)
    }

    pub fn is_idle(&self, agent: AgentId) -> bool {
        self.idle.contains(&agent)
    }

    pub fn is_engaged(&self, agent: AgentId) -> bool {
        self.engaged.contains(&agent)
    }

    pub fn idle(&self) -> &BTreeSet<AgentId> {
        &self.idle
    }

    pub fn engaged(&self) -> &BTreeSet<AgentId> {
        &self.engaged
    }

    pub fn len(&self) -> usize {
        self.idle.len() + self.engaged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn predictor(&self) -> &AttackPredictor {
        &self.predictor
    }
}
