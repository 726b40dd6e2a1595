use state_machine::{State, Transition};

use combat_core::Vec3;

use super::AlertState;
use crate::controller::Blackboard;

/// Walks the patrol route, or holds the guard post, while the player is out
/// of sight.
///
/// A looping route restarts at its first waypoint. A one-shot route ends at
/// its last waypoint and the agent then returns to its post.
#[derive(Clone, Copy, Debug, Default)]
pub struct GuardState {
    next_waypoint: usize,
    patrol_done: bool,
}

impl GuardState {
    /// Distance at which a waypoint counts as reached.
    pub const WAYPOINT_RADIUS: f32 = 50.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the waypoint being walked to, if still patrolling.
    pub fn next_waypoint(&self) -> Option<usize> {
        (!self.patrol_done).then_some(self.next_waypoint)
    }

    fn destination(&mut self, bb: &Blackboard) -> Vec3 {
        if self.patrol_done || bb.waypoints.is_empty() {
            return bb.guard_post;
        }

        let waypoint = bb.waypoints[self.next_waypoint % bb.waypoints.len()];
        let radius_sq = Self::WAYPOINT_RADIUS * Self::WAYPOINT_RADIUS;
        if bb.position.distance_squared(waypoint) > radius_sq {
            return waypoint;
        }

        self.next_waypoint += 1;
        if self.next_waypoint >= bb.waypoints.len() {
            if bb.patrol_continuous {
                self.next_waypoint = 0;
            } else {
                self.patrol_done = true;
                return bb.guard_post;
            }
        }
        bb.waypoints[self.next_waypoint]
    }
}

impl State<Blackboard> for GuardState {
    fn name(&self) -> &'static str {
        "guard"
    }

    fn enter(&mut self, bb: &mut Blackboard) {
        let destination = self.destination(bb);
        bb.move_to(destination);
    }

    fn tick(&mut self, bb: &mut Blackboard, _dt: f32) -> Transition<Blackboard> {
        if bb.sees_player() {
            return Transition::to(AlertState::new());
        }
        let destination = self.destination(bb);
        bb.move_to(destination);
        Transition::Stay
    }
}
