//! The scripted fight driven by the `arena` binary.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use combat_core::{Agent, AgentId, AgentTemplate, AttackDirection, AttackType, PlayerAttack};
use combat_runtime::{Arena, ArenaConfig, PerceivedActor, Reaction};

use crate::host::ScriptedHost;

/// Units per second agents walk toward their movement target.
const AGENT_SPEED: f32 = 150.0;
/// Seconds between two player swings.
const PLAYER_ATTACK_INTERVAL: f32 = 0.6;

/// The player's repeating swing pattern.
const PLAYER_PATTERN: [(AttackDirection, AttackType); 5] = [
    (AttackDirection::RightSlash, AttackType::Quick),
    (AttackDirection::DownwardSlash, AttackType::Strong),
    (AttackDirection::Thrust, AttackType::Feint),
    (AttackDirection::RightSlash, AttackType::Quick),
    (AttackDirection::LeftSlash, AttackType::Quick),
];

/// Totals gathered over one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub ticks: u32,
    pub player_attacks: u32,
    /// Player swings that had a prediction standing when they landed.
    pub predictions: u32,
    pub correct_predictions: u32,
    pub agent_attacks: u32,
    pub parries: u32,
    pub dodges: u32,
    pub feints: u32,
    pub deaths: u32,
    pub peak_engaged: usize,
}

impl SimulationReport {
    /// Share of standing predictions that named the swing that followed.
    pub fn prediction_accuracy(&self) -> Option<f32> {
        (self.predictions > 0).then(|| self.correct_predictions as f32 / self.predictions as f32)
    }
}

pub struct Simulation {
    arena: Arena<ScriptedHost>,
    rng: StdRng,
    tick_seconds: f32,
    next_swing_in: f32,
    pattern_cursor: usize,
    casualty_tick: Option<u32>,
    report: SimulationReport,
}

impl Simulation {
    /// Spawns every template into a fresh arena.
    ///
    /// One agent is killed once half of `ticks` have elapsed.
    pub fn new(
        config: ArenaConfig,
        templates: &[AgentTemplate],
        tick_seconds: f32,
        ticks: u32,
    ) -> combat_runtime::Result<Self> {
        let seed = config.rng_seed;
        let mut arena = Arena::new(config, ScriptedHost::new())?;
        for template in templates {
            arena.spawn_agent(template)?;
        }
        Ok(Self {
            arena,
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            tick_seconds,
            next_swing_in: PLAYER_ATTACK_INTERVAL,
            pattern_cursor: 0,
            casualty_tick: (ticks > 1).then_some(ticks / 2),
            report: SimulationReport::default(),
        })
    }

    /// Runs `ticks` frames and returns the totals.
    pub fn run(mut self, ticks: u32) -> SimulationReport {
        for tick in 0..ticks {
            self.step(tick);
        }
        let report = self.report;
        info!(
            "Simulation finished after {} ticks (budgets left: engagement {}, attack {})",
            report.ticks,
            self.arena.available_engagement_budget(),
            self.arena.available_attack_budget()
        );
        report
    }

    /// Advances the world by one frame.
    pub fn step(&mut self, tick: u32) {
        let dt = self.tick_seconds;
        self.arena.host_mut().advance_player(dt);

        let living: Vec<AgentId> = self.arena.agents().living().map(|r| r.id()).collect();
        for agent in &living {
            let _ = self.arena.sense_update(*agent, vec![PerceivedActor::Player]);
        }

        self.arena.tick(dt);
        self.move_agents(&living, dt);
        self.finish_attacks(dt);
        self.player_swing(dt);

        if self.casualty_tick == Some(tick) {
            self.kill_one();
        }

        self.report.ticks += 1;
        let engaged = self.arena.roster().engaged().len();
        self.report.peak_engaged = self.report.peak_engaged.max(engaged);
        debug!(
            "Tick {}: {} engaged, engagement budget {}, attack budget {}",
            tick,
            engaged,
            self.arena.available_engagement_budget(),
            self.arena.available_attack_budget()
        );
    }

    pub fn arena(&self) -> &Arena<ScriptedHost> {
        &self.arena
    }

    pub fn report(&self) -> &SimulationReport {
        &self.report
    }

    fn move_agents(&mut self, agents: &[AgentId], dt: f32) {
        let step = AGENT_SPEED * dt;
        for agent in agents {
            let Some(target) = self.arena.host().target_of(*agent) else {
                continue;
            };
            if let Some(record) = self.arena.agent_mut(*agent) {
                let offset = target - record.position();
                let next = if offset.length() <= step {
                    target
                } else {
                    record.position() + offset.normalized() * step
                };
                record.set_position(next);
            }
        }
    }

    fn finish_attacks(&mut self, dt: f32) {
        for agent in self.arena.host_mut().finish_attacks(dt) {
            match self.arena.agent_attack_finished(agent) {
                Ok(attack) => {
                    self.report.agent_attacks += 1;
                    debug!("Agent {} finished a {} attack", agent, attack.attack_type);
                }
                Err(err) => debug!("Dropped attack completion for {}: {}", agent, err),
            }
        }
    }

    fn player_swing(&mut self, dt: f32) {
        self.next_swing_in -= dt;
        if self.next_swing_in > 0.0 {
            return;
        }
        self.next_swing_in += PLAYER_ATTACK_INTERVAL;

        let engaged: Vec<AgentId> = self.arena.roster().engaged().iter().copied().collect();
        if engaged.is_empty() {
            return;
        }
        let target = engaged[self.rng.random_range(0..engaged.len())];

        let (direction, attack_type) = PLAYER_PATTERN[self.pattern_cursor];
        self.pattern_cursor = (self.pattern_cursor + 1) % PLAYER_PATTERN.len();
        let attack = PlayerAttack::new(direction, attack_type, target);

        if let Some(prediction) = self.arena.last_prediction() {
            self.report.predictions += 1;
            if prediction.attack == attack.id() {
                self.report.correct_predictions += 1;
            }
        }

        self.report.player_attacks += 1;
        match self.arena.record_player_attack(&attack) {
            Some(Reaction::Parry(_)) => self.report.parries += 1,
            Some(Reaction::Dodge(_)) => self.report.dodges += 1,
            Some(Reaction::Feint(_)) => self.report.feints += 1,
            Some(Reaction::Ignored) | None => {}
        }

        if let Some(prediction) = self.arena.last_prediction() {
            info!(
                "Player hit {} with {}; expecting {} next",
                target,
                attack.id(),
                prediction.attack
            );
        }
    }

    fn kill_one(&mut self) {
        let victim = self
            .arena
            .roster()
            .engaged()
            .iter()
            .next()
            .copied()
            .or_else(|| self.arena.agents().living().map(|record| record.id()).next());
        let Some(victim) = victim else {
            return;
        };

        match self.arena.agent_died(victim) {
            Ok(()) => {
                self.report.deaths += 1;
                info!(
                    "Agent {} was slain (engagement budget left: {})",
                    victim,
                    self.arena.available_engagement_budget()
                );
            }
            Err(err) => warn!("Could not kill {}: {}", victim, err),
        }
    }
}
