//! The attack circle: eight directional slots around the player, gated by an
//! engagement budget (who may stand in the circle) and an attack budget (how
//! much attack pressure may be in flight).
//!
//! Slot world locations are cached relative to the last known player
//! position. Every operation that reads a slot location takes the player's
//! current position and refreshes the cache first, so callers never observe a
//! stale center.

mod budget;
mod error;
mod slot;

pub use budget::Budget;
pub use error::FormationError;
pub use slot::{CircleSlot, Slot, SlotOccupant};

use arrayvec::ArrayVec;

use crate::agent::Agent;
use crate::config::CombatConfig;
use crate::types::{AgentId, Vec3};

/// Slot table, member list and budgets for one player.
#[derive(Clone, Debug)]
pub struct Formation {
    center: Vec3,
    slot_radius: f32,
    slots: [Slot; CombatConfig::SLOT_COUNT],
    /// Circle members in join order.
    members: ArrayVec<AgentId, { CombatConfig::SLOT_COUNT }>,
    engagement: Budget,
    attack: Budget,
}

impl Formation {
    /// Builds a fresh circle around `player_position`: both budgets full,
    /// every slot free.
    pub fn new(config: &CombatConfig, player_position: Vec3) -> Self {
        let slot_radius = config.slot_radius;
        Self {
            center: player_position,
            slot_radius,
            slots: CircleSlot::ALL.map(|kind| Slot::new(kind, slot_radius, player_position)),
            members: ArrayVec::new(),
            engagement: Budget::full(config.max_engagement_budget),
            attack: Budget::full(config.max_attack_budget),
        }
    }

    /// Re-runs initialization: frees every slot and refills both budgets.
    pub fn reset(&mut self, player_position: Vec3) {
        self.engagement.refill();
        self.attack.refill();
        self.members.clear();
        self.slots = CircleSlot::ALL.map(|kind| Slot::new(kind, self.slot_radius, player_position));
        self.center = player_position;
    }

    /// Moves the circle's center to the player and recomputes every slot
    /// location.
    pub fn update_location(&mut self, player_position: Vec3) {
        self.center = player_position;
        for slot in &mut self.slots {
            slot.location = player_position + slot.offset;
        }
    }

    /// Side-effect-free admission check for [`Formation::join_circle`].
    pub fn can_agent_join_circle(&self, agent: &impl Agent) -> bool {
        !self.is_member(agent.id())
            && self.engagement.can_afford(agent.engagement_score())
            && self.slots.iter().any(|slot| !slot.is_occupied())
    }

    /// Admits `attacker` into the nearest free slot if its engagement score
    /// fits the remaining budget.
    ///
    /// Ties between equally distant slots go to the slot that comes first in
    /// [`CircleSlot::ALL`]. On any error the circle is left untouched.
    pub fn join_circle(
        &mut self,
        attacker: &impl Agent,
        player_position: Vec3,
    ) -> Result<CircleSlot, FormationError> {
        let agent = attacker.id();
        if self.is_member(agent) {
            return Err(FormationError::AlreadyInCircle { agent });
        }

        let score = attacker.engagement_score();
        if !self.engagement.can_afford(score) {
            tracing::debug!(
                "Circle rejected {}: score {} exceeds available {}",
                agent,
                score,
                self.engagement.available()
            );
            return Err(FormationError::EngagementBudgetExceeded {
                agent,
                requested: score,
                available: self.engagement.available(),
            });
        }

        self.update_location(player_position);
        let slot = self
            .closest_free_slot(attacker.position(), None)
            .ok_or(FormationError::NoFreeSlot { agent })?;

        self.engagement.try_reserve(score);
        self.slots[slot.index()].occupant = Some(SlotOccupant {
            agent,
            engagement_score: score,
        });
        let pushed = self.members.try_push(agent).is_ok();
        debug_assert!(pushed, "circle member list outgrew the slot table");

        tracing::debug!(
            "Circle admitted {} into {} (engagement budget left: {})",
            agent,
            slot,
            self.engagement.available()
        );
        Ok(slot)
    }

    /// Frees the slot held by `agent` and refunds its engagement score.
    ///
    /// An agent that holds no slot is a desync between the caller and the
    /// circle; it is logged and nothing changes.
    pub fn remove_agent_from_circle(
        &mut self,
        agent: AgentId,
    ) -> Result<CircleSlot, FormationError> {
        let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_held_by(agent)) else {
            tracing::error!(
                "Attempted to remove agent {} who is not currently in the circle",
                agent
            );
            return Err(FormationError::NotInCircle { agent });
        };

        let kind = slot.kind;
        if let Some(occupant) = slot.occupant.take() {
            self.engagement.release(occupant.engagement_score);
        }
        self.members.retain(|member| *member != agent);

        tracing::debug!(
            "Circle released {} from {} (engagement budget left: {})",
            agent,
            kind,
            self.engagement.available()
        );
        Ok(kind)
    }

    /// Moves an existing member to the nearest free slot (its current slot
    /// counts as free). Budgets are unchanged.
    pub fn reassign_slot(
        &mut self,
        agent: &impl Agent,
        player_position: Vec3,
    ) -> Result<CircleSlot, FormationError> {
        let id = agent.id();
        let current = self
            .slot_of(id)
            .ok_or(FormationError::NotInCircle { agent: id })?;

        self.update_location(player_position);
        let best = self
            .closest_free_slot(agent.position(), Some(id))
            .unwrap_or(current);

        if best != current {
            let occupant = self.slots[current.index()].occupant.take();
            self.slots[best.index()].occupant = occupant;
            tracing::debug!("Circle moved {} from {} to {}", id, current, best);
        }
        Ok(best)
    }

    /// Where `agent` should stand: its slot location, or its own position if
    /// it holds no slot.
    pub fn location_for_agent(&mut self, agent: &impl Agent, player_position: Vec3) -> Vec3 {
        let Some(slot) = self.slot_of(agent.id()) else {
            return agent.position();
        };
        self.update_location(player_position);
        self.center + self.slots[slot.index()].offset
    }

    /// Reserves `score` from the attack budget. This is the only admission
    /// gate for concurrent attacks; every success must be paired with
    /// [`Formation::agent_attack_finished`].
    pub fn can_agent_perform_attack(&mut self, score: u32) -> Result<(), FormationError> {
        if self.attack.try_reserve(score) {
            return Ok(());
        }
        tracing::debug!(
            "Circle rejected attack of score {} (available {})",
            score,
            self.attack.available()
        );
        Err(FormationError::AttackBudgetExceeded {
            requested: score,
            available: self.attack.available(),
        })
    }

    /// Returns a finished attack's score to the attack budget.
    pub fn agent_attack_finished(&mut self, score: u32) {
        let discarded = self.attack.release(score);
        if discarded > 0 {
            tracing::warn!(
                "Attack budget release of {} overflowed the maximum by {}",
                score,
                discarded
            );
        }
    }

    fn closest_free_slot(&self, from: Vec3, treat_as_free: Option<AgentId>) -> Option<CircleSlot> {
        let mut best: Option<(CircleSlot, f32)> = None;
        for slot in &self.slots {
            let free = match slot.occupant {
                None => true,
                Some(occupant) => Some(occupant.agent) == treat_as_free,
            };
            if !free {
                continue;
            }
            let distance = from.distance_squared(slot.location);
            // strict comparison keeps the earliest slot on ties
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((slot.kind, distance));
            }
        }
        best.map(|(kind, _)| kind)
    }

    // ===== queries =====

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn slot_radius(&self) -> f32 {
        self.slot_radius
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, kind: CircleSlot) -> &Slot {
        &self.slots[kind.index()]
    }

    /// Cached world location of `kind` as of the last refresh.
    pub fn slot_location(&self, kind: CircleSlot) -> Vec3 {
        self.slots[kind.index()].location
    }

    pub fn slot_of(&self, agent: AgentId) -> Option<CircleSlot> {
        self.slots
            .iter()
            .find(|slot| slot.is_held_by(agent))
            .map(|slot| slot.kind)
    }

    pub fn occupant(&self, kind: CircleSlot) -> Option<AgentId> {
        self.slots[kind.index()].occupant.map(|o| o.agent)
    }

    pub fn members(&self) -> &[AgentId] {
        &self.members
    }

    pub fn is_member(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    pub fn free_slot_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_occupied()).count()
    }

    pub fn available_engagement_budget(&self) -> u32 {
        self.engagement.available()
    }

    pub fn max_engagement_budget(&self) -> u32 {
        self.engagement.maximum()
    }

    pub fn available_attack_budget(&self) -> u32 {
        self.attack.available()
    }

    pub fn max_attack_budget(&self) -> u32 {
        self.attack.maximum()
    }
}
