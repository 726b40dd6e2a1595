//! Per-agent controllers.
//!
//! An [`AgentController`] owns one agent's state machine and its in-flight
//! attack reservation. It is the only code path that mutates the formation
//! and the roster on the agent's behalf, which keeps circle membership and
//! the engaged set in lockstep.

mod blackboard;

pub use blackboard::{Blackboard, Intent, PerceivedActor, StateTuning};

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use combat_core::{
    Agent, AgentId, AttackDirection, AttackId, AttackType, CircleSlot, Formation, Roster,
    RosterError,
};
use state_machine::{State, StateMachine};

use crate::agents::AgentRecord;
use crate::api::{CombatHost, Result, RuntimeError};

/// Mutable borrows of the shared coordination state, handed to a controller
/// for the duration of one call.
pub struct CombatContext<'a, H: CombatHost> {
    pub host: &'a mut H,
    pub formation: &'a mut Formation,
    pub roster: &'a mut Roster,
    pub rng: &'a mut StdRng,
}

/// How an agent responded to an incoming attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// The agent was busy or dead.
    Ignored,
    Parry(AttackDirection),
    Dodge(AttackDirection),
    Feint(AttackDirection),
}

/// An admitted attack whose score is still reserved from the attack budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InFlightAttack {
    pub attack_type: AttackType,
    pub score: u32,
}

pub struct AgentController {
    agent: AgentId,
    machine: StateMachine<Blackboard>,
    blackboard: Blackboard,
    attack: Option<InFlightAttack>,
}

impl AgentController {
    /// Creates a controller that enters `initial` on its first tick.
    pub fn new(
        record: &AgentRecord,
        tuning: StateTuning,
        initial: Box<dyn State<Blackboard>>,
    ) -> Self {
        let blackboard =
            Blackboard::new(record.id(), record.position(), record.guard_post(), tuning)
                .with_patrol(record.waypoints().to_vec(), record.patrol_continuous());
        Self {
            agent: record.id(),
            machine: StateMachine::new(initial),
            blackboard,
            attack: None,
        }
    }

    /// Runs one frame for the agent.
    ///
    /// Order: refresh the blackboard, tick the current state, apply any
    /// pending state swap, issue the movement command, then carry out the
    /// intents the states queued. Dead agents are skipped entirely.
    pub fn tick<H: CombatHost>(
        &mut self,
        record: &mut AgentRecord,
        ctx: &mut CombatContext<'_, H>,
        dt: f32,
    ) {
        if record.is_dead() {
            return;
        }

        self.sync(record, ctx);
        if let Some(entered) = self.machine.tick(&mut self.blackboard, dt) {
            info!("Agent {} entered {}", record, entered);
        }

        if let Some(location) = self.blackboard.target_location {
            ctx.host.move_to(self.agent, location);
        }

        for intent in self.blackboard.take_intents() {
            let outcome = match intent {
                Intent::JoinCombat => self.join_combat(record, ctx).map(|_| ()),
                Intent::FleeCombat => self.flee_combat(record, ctx),
                Intent::Attack => self.attack_player(record, ctx).map(|_| ()),
            };
            if let Err(err) = outcome {
                debug!("Agent {} could not carry out {:?}: {}", record, intent, err);
            }
        }
    }

    /// Admits the agent to the circle and the engaged set together.
    ///
    /// The roster check runs first so a rejected join never touches the
    /// circle; a roster failure after the circle admitted the agent rolls
    /// the circle back.
    pub fn join_combat<H: CombatHost>(
        &mut self,
        record: &mut AgentRecord,
        ctx: &mut CombatContext<'_, H>,
    ) -> Result<CircleSlot> {
        ctx.roster.can_join_combat(&*record)?;

        let player = ctx.host.player_position();
        let slot = ctx.formation.join_circle(&*record, player)?;
        if let Err(err) = ctx.roster.have_agent_join_combat(record) {
            release_slot(ctx.formation, record);
            return Err(err.into());
        }

        self.blackboard.in_combat = true;
        ctx.host.enter_combat(self.agent);
        info!(
            "Agent {} joined combat at {} (engagement budget left: {})",
            record,
            slot,
            ctx.formation.available_engagement_budget()
        );
        Ok(slot)
    }

    /// Releases the agent's slot and any reserved attack budget, then moves
    /// it back to the idle set.
    pub fn flee_combat<H: CombatHost>(
        &mut self,
        record: &mut AgentRecord,
        ctx: &mut CombatContext<'_, H>,
    ) -> Result<()> {
        ctx.roster.can_flee_combat(&*record)?;

        self.cancel_attack(record, ctx);
        if ctx.formation.is_member(self.agent) {
            ctx.formation.remove_agent_from_circle(self.agent)?;
        } else {
            warn!("Agent {} fled combat without holding a circle slot", record);
        }
        ctx.roster.have_agent_flee_combat(record)?;

        self.blackboard.in_combat = false;
        self.blackboard.slot_location = None;
        ctx.host.leave_combat(self.agent);
        info!("Agent {} fled combat", record);
        Ok(())
    }

    /// Picks an attack from the agent's profile and reserves its score from
    /// the attack budget. Returns the reserved score.
    pub fn attack_player<H: CombatHost>(
        &mut self,
        record: &mut AgentRecord,
        ctx: &mut CombatContext<'_, H>,
    ) -> Result<u32> {
        if record.is_dead() {
            return Err(RuntimeError::AgentDead { agent: self.agent });
        }
        if self.attack.is_some() {
            return Err(RuntimeError::AttackInFlight { agent: self.agent });
        }
        if !ctx.roster.is_engaged(self.agent) {
            return Err(RosterError::NotEngaged { agent: self.agent }.into());
        }

        let (attack_type, score) = record.attack_profile().choose(&mut *ctx.rng);
        ctx.formation.can_agent_perform_attack(score)?;

        self.attack = Some(InFlightAttack { attack_type, score });
        record.set_busy(true);
        self.blackboard.busy = true;
        ctx.host.perform_attack(self.agent, score);
        debug!(
            "Agent {} attacks with a {} attack (attack budget left: {})",
            record,
            attack_type,
            ctx.formation.available_attack_budget()
        );
        Ok(score)
    }

    /// Returns the in-flight attack's score to the attack budget.
    pub fn attack_finished<H: CombatHost>(
        &mut self,
        record: &mut AgentRecord,
        ctx: &mut CombatContext<'_, H>,
    ) -> Result<InFlightAttack> {
        let attack = self
            .attack
            .take()
            .ok_or(RuntimeError::NoAttackInFlight { agent: self.agent })?;
        ctx.formation.agent_attack_finished(attack.score);
        record.set_busy(false);
        self.blackboard.busy = false;
        Ok(attack)
    }

    /// Chooses and performs a defensive reaction to `attack`.
    ///
    /// With probability `trust` the agent believes `attack`; otherwise it
    /// guesses a uniformly random attack id. The chosen attack's type picks
    /// the reaction: quick → parry, strong → dodge, feint → feint response.
    pub fn react_to_incoming_attack<H: CombatHost>(
        &mut self,
        record: &AgentRecord,
        ctx: &mut CombatContext<'_, H>,
        attack: AttackId,
        trust: f32,
    ) -> Reaction {
        if record.is_dead() || record.is_busy() {
            debug!("Agent {} ignores incoming {}", record, attack);
            return Reaction::Ignored;
        }

        let roll: f32 = ctx.rng.random();
        let chosen = if roll < trust {
            attack
        } else {
            AttackId::random(&mut *ctx.rng)
        };

        let (direction, attack_type) = chosen.decode();
        let reaction = match attack_type {
            AttackType::Quick => {
                ctx.host.parry(self.agent, direction);
                Reaction::Parry(direction)
            }
            AttackType::Strong => {
                ctx.host.dodge(self.agent, direction);
                Reaction::Dodge(direction)
            }
            AttackType::Feint => {
                ctx.host.react_to_feint(self.agent, direction);
                Reaction::Feint(direction)
            }
        };
        debug!("Agent {} reacts to {} with {:?}", record, chosen, reaction);
        reaction
    }

    /// Tears the controller down: exits the current state, frees the slot
    /// and any reserved attack budget, unregisters the agent and releases
    /// it to the host.
    pub fn on_death<H: CombatHost>(
        &mut self,
        record: &mut AgentRecord,
        ctx: &mut CombatContext<'_, H>,
    ) {
        self.machine.stop(&mut self.blackboard);
        self.cancel_attack(record, ctx);

        if ctx.formation.is_member(self.agent) {
            release_slot(ctx.formation, record);
        }
        if ctx.roster.remove_agent(self.agent).is_err() {
            warn!("Agent {} died without being registered", record);
        }
        if record.is_in_combat() {
            record.leave_combat();
        }

        ctx.host.release(self.agent);
        info!(
            "Agent {} died (engagement budget: {}/{})",
            record,
            ctx.formation.available_engagement_budget(),
            ctx.formation.max_engagement_budget()
        );
    }

    /// Schedules `next` to replace the current state after the next tick.
    pub fn swap_state(&mut self, next: Box<dyn State<Blackboard>>) {
        debug!("Agent {} requested state {}", self.agent, next.name());
        self.machine.request(next);
    }

    /// Stores the latest perception snapshot.
    pub fn sense_update(&mut self, perceived: Vec<PerceivedActor>) {
        self.blackboard.perceived = perceived;
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn in_flight_attack(&self) -> Option<InFlightAttack> {
        self.attack
    }

    pub fn current_state(&self) -> Option<&'static str> {
        self.machine.current_name()
    }

    pub fn has_pending_state(&self) -> bool {
        self.machine.has_pending()
    }

    fn sync<H: CombatHost>(&mut self, record: &AgentRecord, ctx: &mut CombatContext<'_, H>) {
        let player = ctx.host.player_position();
        let bb = &mut self.blackboard;
        bb.position = record.position();
        bb.player_position = player;
        bb.in_combat = record.is_in_combat();
        bb.busy = record.is_busy();
        bb.slot_location = ctx
            .formation
            .is_member(self.agent)
            .then(|| ctx.formation.location_for_agent(record, player));
    }

    fn cancel_attack<H: CombatHost>(
        &mut self,
        record: &mut AgentRecord,
        ctx: &mut CombatContext<'_, H>,
    ) {
        if let Some(attack) = self.attack.take() {
            ctx.formation.agent_attack_finished(attack.score);
            record.set_busy(false);
            self.blackboard.busy = false;
            debug!("Agent {} abandoned its {} attack", record, attack.attack_type);
        }
    }
}

/// Frees `record`'s circle slot. Returns `false`, with a warning, when the
/// circle did not hold the agent.
fn release_slot(formation: &mut Formation, record: &AgentRecord) -> bool {
    match formation.remove_agent_from_circle(record.id()) {
        Ok(_) => true,
        Err(err) => {
            warn!("Agent {} lost its circle slot out of order: {}", record, err);
            false
        }
    }
}

impl std::fmt::Debug for AgentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentController")
            .field("agent", &self.agent)
            .field("machine", &self.machine)
            .field("attack", &self.attack)
            .finish()
    }
}
