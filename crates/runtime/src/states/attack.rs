use state_machine::{State, Transition};

use super::{AlertState, GuardState};
use crate::controller::{Blackboard, Intent};

/// Holds the circle slot and asks to attack whenever the agent is idle and
/// the attack interval has elapsed.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackState {
    next_attack_in: f32,
}

impl AttackState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State<Blackboard> for AttackState {
    fn name(&self) -> &'static str {
        "attack"
    }

    fn enter(&mut self, bb: &mut Blackboard) {
        self.next_attack_in = bb.tuning.attack_interval_seconds;
    }

    fn tick(&mut self, bb: &mut Blackboard, dt: f32) -> Transition<Blackboard> {
        if !bb.sees_player() {
            if bb.in_combat {
                bb.request(Intent::FleeCombat);
            }
            return Transition::to(GuardState::new());
        }
        if !bb.in_combat {
            return Transition::to(AlertState::new());
        }

        bb.move_to(bb.slot_location.unwrap_or(bb.player_position));
        if !bb.busy {
            self.next_attack_in -= dt;
            if self.next_attack_in <= 0.0 {
                bb.request(Intent::Attack);
                self.next_attack_in = bb.tuning.attack_interval_seconds;
            }
        }
        Transition::Stay
    }
}
