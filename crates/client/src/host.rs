//! A world stand-in for the scripted fight.
//!
//! The host moves the player on a circle, remembers where each agent was
//! told to go, and queues attack completions. Everything it is asked to do
//! is logged.

use std::collections::BTreeMap;

use tracing::{debug, info};

use combat_core::{AgentId, AttackDirection, Vec3};
use combat_runtime::CombatHost;

/// An agent attack that the host is still "animating".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingAttack {
    pub agent: AgentId,
    pub remaining: f32,
}

#[derive(Clone, Debug)]
pub struct ScriptedHost {
    player: Vec3,
    orbit_radius: f32,
    orbit_speed: f32,
    angle: f32,
    attack_duration: f32,
    targets: BTreeMap<AgentId, Vec3>,
    attacks: Vec<PendingAttack>,
    reactions: u32,
}

impl ScriptedHost {
    pub const DEFAULT_ORBIT_RADIUS: f32 = 200.0;
    /// Radians per second.
    pub const DEFAULT_ORBIT_SPEED: f32 = 0.4;
    pub const DEFAULT_ATTACK_DURATION: f32 = 0.8;

    pub fn new() -> Self {
        Self {
            player: Vec3::new(Self::DEFAULT_ORBIT_RADIUS, 0.0, 0.0),
            orbit_radius: Self::DEFAULT_ORBIT_RADIUS,
            orbit_speed: Self::DEFAULT_ORBIT_SPEED,
            angle: 0.0,
            attack_duration: Self::DEFAULT_ATTACK_DURATION,
            targets: BTreeMap::new(),
            attacks: Vec::new(),
            reactions: 0,
        }
    }

    /// Moves the player `dt` seconds further along its orbit.
    pub fn advance_player(&mut self, dt: f32) {
        self.angle += self.orbit_speed * dt;
        self.player = Vec3::new(
            self.orbit_radius * self.angle.cos(),
            self.orbit_radius * self.angle.sin(),
            0.0,
        );
    }

    /// Last location `agent` was told to move to.
    pub fn target_of(&self, agent: AgentId) -> Option<Vec3> {
        self.targets.get(&agent).copied()
    }

    /// Advances every pending attack by `dt` and returns the agents whose
    /// attack just completed.
    pub fn finish_attacks(&mut self, dt: f32) -> Vec<AgentId> {
        let mut finished = Vec::new();
        self.attacks.retain_mut(|attack| {
            attack.remaining -= dt;
            if attack.remaining <= 0.0 {
                finished.push(attack.agent);
                false
            } else {
                true
            }
        });
        finished
    }

    pub fn pending_attacks(&self) -> &[PendingAttack] {
        &self.attacks
    }

    pub fn reactions(&self) -> u32 {
        self.reactions
    }

    fn forget(&mut self, agent: AgentId) {
        self.targets.remove(&agent);
        self.attacks.retain(|attack| attack.agent != agent);
    }
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatHost for ScriptedHost {
    fn player_position(&self) -> Vec3 {
        self.player
    }

    fn enter_combat(&mut self, agent: AgentId) {
        info!("Host: {} draws its weapon", agent);
    }

    fn leave_combat(&mut self, agent: AgentId) {
        info!("Host: {} backs off", agent);
    }

    fn perform_attack(&mut self, agent: AgentId, score: u32) {
        debug!("Host: {} swings (score {})", agent, score);
        self.attacks.push(PendingAttack {
            agent,
            remaining: self.attack_duration,
        });
    }

    fn parry(&mut self, agent: AgentId, direction: AttackDirection) {
        self.reactions += 1;
        debug!("Host: {} parries {}", agent, direction);
    }

    fn dodge(&mut self, agent: AgentId, direction: AttackDirection) {
        self.reactions += 1;
        debug!("Host: {} dodges {}", agent, direction);
    }

    fn react_to_feint(&mut self, agent: AgentId, direction: AttackDirection) {
        self.reactions += 1;
        debug!("Host: {} holds against a feint from {}", agent, direction);
    }

    fn move_to(&mut self, agent: AgentId, location: Vec3) {
        self.targets.insert(agent, location);
    }

    fn release(&mut self, agent: AgentId) {
        info!("Host: {} collapses", agent);
        self.forget(agent);
    }
}
