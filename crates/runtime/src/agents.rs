//! The authoritative agent table.
//!
//! The formation and roster store only [`AgentId`] handles; every piece of
//! per-agent data lives in an [`AgentRecord`] owned by the [`AgentTable`].

use std::fmt;

use combat_core::{Agent, AgentId, AgentTemplate, AttackProfile, Vec3};

use crate::api::{Result, RuntimeError};

/// Runtime state of one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentRecord {
    id: AgentId,
    name: Option<String>,
    position: Vec3,
    guard_post: Vec3,
    waypoints: Vec<Vec3>,
    patrol_continuous: bool,
    engagement_score: u32,
    attack_profile: AttackProfile,
    busy: bool,
    dead: bool,
    in_combat: bool,
}

impl AgentRecord {
    pub fn from_template(id: AgentId, template: &AgentTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            position: template.position,
            guard_post: template.guard_post(),
            waypoints: template.waypoints.clone(),
            patrol_continuous: template.patrol_continuous,
            engagement_score: template.engagement_score,
            attack_profile: template.attack_profile,
            busy: false,
            dead: false,
            in_combat: false,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn guard_post(&self) -> Vec3 {
        self.guard_post
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn patrol_continuous(&self) -> bool {
        self.patrol_continuous
    }

    pub fn attack_profile(&self) -> &AttackProfile {
        &self.attack_profile
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Hosts flag agents busy while a parry, dodge or similar action plays.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub(crate) fn mark_dead(&mut self) {
        self.dead = true;
        self.busy = false;
    }
}

impl Agent for AgentRecord {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn engagement_score(&self) -> u32 {
        self.engagement_score
    }

    fn is_busy(&self) -> bool {
        self.busy
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn is_in_combat(&self) -> bool {
        self.in_combat
    }

    fn join_combat(&mut self) {
        self.in_combat = true;
    }

    fn leave_combat(&mut self) {
        self.in_combat = false;
    }
}

impl fmt::Display for AgentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Owns every agent record. Ids are dense and never reused.
#[derive(Clone, Debug, Default)]
pub struct AgentTable {
    records: Vec<AgentRecord>,
}

impl AgentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id and stores a record built from `template`.
    ///
    /// Fails once every `u32` id has been handed out.
    pub fn insert(&mut self, template: &AgentTemplate) -> Result<AgentId> {
        let id = next_id(self.records.len())?;
        self.records.push(AgentRecord::from_template(id, template));
        Ok(id)
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.records.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        self.records.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.records.iter().map(|record| record.id)
    }

    pub fn living(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.iter().filter(|record| !record.dead)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn next_id(len: usize) -> Result<AgentId> {
    u32::try_from(len)
        .map(AgentId)
        .map_err(|_| RuntimeError::AgentTableFull { len })
}
