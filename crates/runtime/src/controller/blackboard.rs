//! Per-agent scratch state shared between a controller and its states.

use combat_core::{AgentId, Vec3};

/// Something the agent currently perceives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerceivedActor {
    Player,
    Agent(AgentId),
}

/// A request raised by a state during its tick. The controller carries it
/// out once the tick (and any state swap) has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    JoinCombat,
    FleeCombat,
    Attack,
}

/// Timing knobs read by the built-in states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateTuning {
    pub join_retry_seconds: f32,
    pub attack_interval_seconds: f32,
}

/// Everything a state may read or write.
///
/// The controller refreshes the agent snapshot before every tick. States
/// never touch the formation or roster directly; they queue [`Intent`]s.
#[derive(Clone, Debug)]
pub struct Blackboard {
    pub agent: AgentId,
    pub position: Vec3,
    pub guard_post: Vec3,
    /// Patrol route walked by the guard state.
    pub waypoints: Vec<Vec3>,
    pub patrol_continuous: bool,
    pub player_position: Vec3,
    /// World location of the agent's circle slot, if it holds one.
    pub slot_location: Option<Vec3>,
    pub in_combat: bool,
    pub busy: bool,
    /// Last perception snapshot, stored as delivered.
    pub perceived: Vec<PerceivedActor>,
    /// Where the agent is told to move at the end of each tick.
    pub target_location: Option<Vec3>,
    pub tuning: StateTuning,
    intents: Vec<Intent>,
}

impl Blackboard {
    pub fn new(agent: AgentId, position: Vec3, guard_post: Vec3, tuning: StateTuning) -> Self {
        Self {
            agent,
            position,
            guard_post,
            waypoints: Vec::new(),
            patrol_continuous: true,
            player_position: Vec3::ZERO,
            slot_location: None,
            in_combat: false,
            busy: false,
            perceived: Vec::new(),
            target_location: None,
            tuning,
            intents: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_patrol(mut self, waypoints: Vec<Vec3>, continuous: bool) -> Self {
        self.waypoints = waypoints;
        self.patrol_continuous = continuous;
        self
    }

    pub fn sees_player(&self) -> bool {
        self.perceived.contains(&PerceivedActor::Player)
    }

    /// Queues `intent` unless the same intent is already queued.
    pub fn request(&mut self, intent: Intent) {
        if !self.intents.contains(&intent) {
            self.intents.push(intent);
        }
    }

    pub fn pending_intents(&self) -> &[Intent] {
        &self.intents
    }

    pub(crate) fn take_intents(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    pub fn move_to(&mut self, location: Vec3) {
        self.target_location = Some(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blackboard() -> Blackboard {
        Blackboard::new(
            AgentId(0),
            Vec3::ZERO,
            Vec3::ZERO,
            StateTuning {
                join_retry_seconds: 1.0,
                attack_interval_seconds: 1.0,
            },
        )
    }

    #[test]
    fn duplicate_intents_collapse() {
        let mut bb = blackboard();
        bb.request(Intent::JoinCombat);
        bb.request(Intent::JoinCombat);
        bb.request(Intent::Attack);
        assert_eq!(bb.take_intents(), vec![Intent::JoinCombat, Intent::Attack]);
        assert!(bb.pending_intents().is_empty());
    }

    #[test]
    fn player_visibility_follows_snapshot() {
        let mut bb = blackboard();
        assert!(!bb.sees_player());
        bb.perceived = vec![PerceivedActor::Agent(AgentId(3)), PerceivedActor::Player];
        assert!(bb.sees_player());
    }
}
