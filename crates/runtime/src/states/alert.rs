use state_machine::{State, Transition};

use super::{AttackState, GuardState};
use crate::controller::{Blackboard, Intent};

/// Approaches the player and asks to join combat, retrying on an interval
/// while the circle is full.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlertState {
    retry_in: f32,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State<Blackboard> for AlertState {
    fn name(&self) -> &'static str {
        "alert"
    }

    fn enter(&mut self, bb: &mut Blackboard) {
        self.retry_in = 0.0;
        bb.move_to(bb.player_position);
    }

    fn tick(&mut self, bb: &mut Blackboard, dt: f32) -> Transition<Blackboard> {
        if !bb.sees_player() {
            return Transition::to(GuardState::new());
        }
        if bb.in_combat {
            return Transition::to(AttackState::new());
        }

        bb.move_to(bb.player_position);
        self.retry_in -= dt;
        if self.retry_in <= 0.0 {
            bb.request(Intent::JoinCombat);
            self.retry_in = bb.tuning.join_retry_seconds;
        }
        Transition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{PerceivedActor, StateTuning};
    use combat_core::{AgentId, Vec3};

    fn blackboard() -> Blackboard {
        let mut bb = Blackboard::new(
            AgentId(0),
            Vec3::ZERO,
            Vec3::ZERO,
            StateTuning {
                join_retry_seconds: 1.0,
                attack_interval_seconds: 1.0,
            },
        );
        bb.perceived.push(PerceivedActor::Player);
        bb.player_position = Vec3::new(50.0, 0.0, 0.0);
        bb
    }

    #[test]
    fn requests_join_then_waits_for_retry_interval() {
        let mut bb = blackboard();
        let mut alert = AlertState::new();
        alert.enter(&mut bb);

        alert.tick(&mut bb, 0.25);
        assert_eq!(bb.take_intents(), vec![Intent::JoinCombat]);
        assert_eq!(bb.target_location, Some(Vec3::new(50.0, 0.0, 0.0)));

        alert.tick(&mut bb, 0.5);
        assert!(bb.pending_intents().is_empty());

        alert.tick(&mut bb, 0.5);
        assert_eq!(bb.take_intents(), vec![Intent::JoinCombat]);
    }

    #[test]
    fn engaged_agent_moves_to_attack() {
        let mut bb = blackboard();
        bb.in_combat = true;
        let transition = AlertState::new().tick(&mut bb, 0.1);
        assert!(matches!(transition, Transition::Switch(ref next) if next.name() == "attack"));
    }

    #[test]
    fn losing_sight_returns_to_guard() {
        let mut bb = blackboard();
        bb.perceived.clear();
        let transition = AlertState::new().tick(&mut bb, 0.1);
        assert!(matches!(transition, Transition::Switch(ref next) if next.name() == "guard"));
        assert!(bb.pending_intents().is_empty());
    }
}
