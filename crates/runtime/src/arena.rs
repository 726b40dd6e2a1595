//! High-level combat orchestrator.
//!
//! The arena owns every piece of shared coordination state (agent table,
//! formation, roster, controllers, RNG) and exposes the entry points a host
//! calls: spawning, ticking, player attacks, attack completion, perception
//! and death.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use combat_core::{
    Agent, AgentId, AgentTemplate, CircleSlot, CombatConfig, Formation, PlayerAttack, Prediction,
    Roster, Vec3,
};
use state_machine::State;

use crate::agents::{AgentRecord, AgentTable};
use crate::api::{CombatHost, Result, RuntimeError};
use crate::controller::{
    AgentController, Blackboard, CombatContext, InFlightAttack, PerceivedActor, Reaction,
    StateTuning,
};
use crate::states::GuardState;

/// Arena configuration shared by the formation, roster and built-in states.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    pub combat: CombatConfig,
    /// Seed for the arena's RNG (attack choice, reaction trust rolls,
    /// fallback predictions).
    pub rng_seed: u64,
    pub join_retry_seconds: f32,
    pub attack_interval_seconds: f32,
}

impl ArenaConfig {
    pub const DEFAULT_RNG_SEED: u64 = 0x5EED;
    pub const DEFAULT_JOIN_RETRY_SECONDS: f32 = 1.0;
    pub const DEFAULT_ATTACK_INTERVAL_SECONDS: f32 = 2.5;

    pub fn new(combat: CombatConfig) -> Self {
        Self {
            combat,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    #[must_use]
    pub fn with_join_retry_seconds(mut self, seconds: f32) -> Self {
        self.join_retry_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_attack_interval_seconds(mut self, seconds: f32) -> Self {
        self.attack_interval_seconds = seconds;
        self
    }

    pub fn tuning(&self) -> StateTuning {
        StateTuning {
            join_retry_seconds: self.join_retry_seconds,
            attack_interval_seconds: self.attack_interval_seconds,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            rng_seed: Self::DEFAULT_RNG_SEED,
            join_retry_seconds: Self::DEFAULT_JOIN_RETRY_SECONDS,
            attack_interval_seconds: Self::DEFAULT_ATTACK_INTERVAL_SECONDS,
        }
    }
}

/// Single-threaded tick loop over every agent fighting one player.
pub struct Arena<H: CombatHost> {
    config: ArenaConfig,
    host: H,
    agents: AgentTable,
    formation: Formation,
    roster: Roster,
    controllers: BTreeMap<AgentId, AgentController>,
    rng: StdRng,
    last_prediction: Option<Prediction>,
}

impl<H: CombatHost> Arena<H> {
    /// Builds an empty arena around the host's current player position.
    pub fn new(config: ArenaConfig, host: H) -> Result<Self> {
        config.combat.validate()?;
        let formation = Formation::new(&config.combat, host.player_position());
        let roster = Roster::new(&config.combat);
        let rng = StdRng::seed_from_u64(config.rng_seed);
        Ok(Self {
            config,
            host,
            agents: AgentTable::new(),
            formation,
            roster,
            controllers: BTreeMap::new(),
            rng,
            last_prediction: None,
        })
    }

    /// Adds an agent to the table, registers it with the roster and gives it
    /// a controller starting in [`GuardState`].
    pub fn spawn_agent(&mut self, template: &AgentTemplate) -> Result<AgentId> {
        self.spawn_agent_in(template, Box::new(GuardState::new()))
    }

    /// Like [`Arena::spawn_agent`] with a caller-chosen initial state.
    pub fn spawn_agent_in(
        &mut self,
        template: &AgentTemplate,
        initial: Box<dyn State<Blackboard>>,
    ) -> Result<AgentId> {
        let id = self.agents.insert(template)?;
        self.roster.register_agent(id);
        if let Some(record) = self.agents.get(id) {
            let controller = AgentController::new(record, self.config.tuning(), initial);
            self.controllers.insert(id, controller);
            info!("Spawned agent {} at {}", record, record.position());
        }
        Ok(id)
    }

    /// Advances every living controller once, in id order.
    pub fn tick(&mut self, dt: f32) {
        let Self {
            host,
            agents,
            formation,
            roster,
            controllers,
            rng,
            ..
        } = self;
        let mut ctx = CombatContext {
            host,
            formation,
            roster,
            rng,
        };
        for (id, controller) in controllers.iter_mut() {
            if let Some(record) = agents.get_mut(*id) {
                controller.tick(record, &mut ctx, dt);
            }
        }
    }

    pub fn have_agent_join_combat(&mut self, agent: AgentId) -> Result<CircleSlot> {
        self.with_controller(agent, |controller, record, ctx| {
            controller.join_combat(record, ctx)
        })
    }

    pub fn have_agent_flee_combat(&mut self, agent: AgentId) -> Result<()> {
        self.with_controller(agent, |controller, record, ctx| {
            controller.flee_combat(record, ctx)
        })
    }

    /// Makes `agent` attack the player now, bypassing its state's timer.
    pub fn have_agent_attack(&mut self, agent: AgentId) -> Result<u32> {
        self.with_controller(agent, |controller, record, ctx| {
            controller.attack_player(record, ctx)
        })
    }

    /// Host callback: `agent`'s attack animation completed.
    pub fn agent_attack_finished(&mut self, agent: AgentId) -> Result<InFlightAttack> {
        self.with_controller(agent, |controller, record, ctx| {
            controller.attack_finished(record, ctx)
        })
    }

    /// Host callback: the player attacked.
    ///
    /// The attack is folded into the predictor (ignored while nobody is
    /// engaged), the stored prediction is refreshed, and an engaged target
    /// reacts. Returns the target's reaction, if it was asked to react.
    pub fn record_player_attack(&mut self, attack: &PlayerAttack) -> Option<Reaction> {
        let notice = self.roster.record_player_attack(attack);
        if !self.roster.engaged().is_empty() {
            self.last_prediction = self.roster.predict_next_attack(&mut self.rng);
            if let Some(prediction) = self.last_prediction {
                debug!(
                    "Predicted next player attack: {} (score {}, {:?})",
                    prediction.attack, prediction.score, prediction.source
                );
            }
        }

        let notice = notice?;
        let trust = self.config.combat.prediction_trust;
        self.with_controller(notice.target, |controller, record, ctx| {
            Ok(controller.react_to_incoming_attack(record, ctx, notice.attack, trust))
        })
        .ok()
    }

    /// Host callback: `agent` died. Frees its slot and reserved attack
    /// budget, unregisters it and drops its controller. The record stays in
    /// the table, flagged dead.
    pub fn agent_died(&mut self, agent: AgentId) -> Result<()> {
        let mut controller = self
            .controllers
            .remove(&agent)
            .ok_or(RuntimeError::UnknownAgent { agent })?;
        let record = self
            .agents
            .get_mut(agent)
            .ok_or(RuntimeError::UnknownAgent { agent })?;
        record.mark_dead();

        let mut ctx = CombatContext {
            host: &mut self.host,
            formation: &mut self.formation,
            roster: &mut self.roster,
            rng: &mut self.rng,
        };
        controller.on_death(record, &mut ctx);
        Ok(())
    }

    /// Host callback: new perception snapshot for `agent`.
    pub fn sense_update(&mut self, agent: AgentId, perceived: Vec<PerceivedActor>) -> Result<()> {
        self.controller_mut(agent)?.sense_update(perceived);
        Ok(())
    }

    /// Schedules a state swap for `agent`; applied during its next tick.
    pub fn swap_state(&mut self, agent: AgentId, next: Box<dyn State<Blackboard>>) -> Result<()> {
        self.controller_mut(agent)?.swap_state(next);
        Ok(())
    }

    /// Moves a circle member to the nearest free slot from where it stands.
    pub fn reassign_slot(&mut self, agent: AgentId) -> Result<CircleSlot> {
        let record = self
            .agents
            .get(agent)
            .ok_or(RuntimeError::UnknownAgent { agent })?;
        let player = self.host.player_position();
        Ok(self.formation.reassign_slot(record, player)?)
    }

    // ===== queries =====

    pub fn available_engagement_budget(&self) -> u32 {
        self.formation.available_engagement_budget()
    }

    pub fn available_attack_budget(&self) -> u32 {
        self.formation.available_attack_budget()
    }

    pub fn circle_members(&self) -> &[AgentId] {
        self.formation.members()
    }

    /// Slot location for `agent`, or its own position if it holds no slot.
    pub fn location_for_agent(&mut self, agent: AgentId) -> Option<Vec3> {
        let record = self.agents.get(agent)?;
        let player = self.host.player_position();
        Some(self.formation.location_for_agent(record, player))
    }

    pub fn last_prediction(&self) -> Option<Prediction> {
        self.last_prediction
    }

    pub fn agent(&self, agent: AgentId) -> Option<&AgentRecord> {
        self.agents.get(agent)
    }

    pub fn agent_mut(&mut self, agent: AgentId) -> Option<&mut AgentRecord> {
        self.agents.get_mut(agent)
    }

    pub fn agents(&self) -> &AgentTable {
        &self.agents
    }

    pub fn controller(&self, agent: AgentId) -> Option<&AgentController> {
        self.controllers.get(&agent)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    fn controller_mut(&mut self, agent: AgentId) -> Result<&mut AgentController> {
        self.controllers
            .get_mut(&agent)
            .ok_or(RuntimeError::UnknownAgent { agent })
    }

    fn with_controller<T, F>(&mut self, agent: AgentId, f: F) -> Result<T>
    where
        F: FnOnce(&mut AgentController, &mut AgentRecord, &mut CombatContext<'_, H>) -> Result<T>,
    {
        let controller = self
            .controllers
            .get_mut(&agent)
            .ok_or(RuntimeError::UnknownAgent { agent })?;
        let record = self
            .agents
            .get_mut(agent)
            .ok_or(RuntimeError::UnknownAgent { agent })?;
        if record.is_dead() {
            return Err(RuntimeError::AgentDead { agent });
        }
        let mut ctx = CombatContext {
            host: &mut self.host,
            formation: &mut self.formation,
            roster: &mut self.roster,
            rng: &mut self.rng,
        };
        f(controller, record, &mut ctx)
    }
}
