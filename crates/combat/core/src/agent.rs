//! The agent contract consumed by the formation and roster.

use rand::Rng;

use crate::attack::AttackType;
use crate::types::{AgentId, Vec3};

/// View of an AI agent as seen by the coordination layer.
///
/// Implementations live in the runtime's agent table. The formation only
/// reads through this trait; the roster additionally drives the combat hooks.
pub trait Agent {
    fn id(&self) -> AgentId;

    fn position(&self) -> Vec3;

    /// Cost of holding a slot in the attack circle.
    fn engagement_score(&self) -> u32;

    /// Whether an action (attack, parry, dodge) is currently in progress.
    fn is_busy(&self) -> bool;

    fn is_dead(&self) -> bool;

    fn is_in_combat(&self) -> bool;

    /// Enter-combat hook, called once the roster has moved the agent to the
    /// engaged set.
    fn join_combat(&mut self);

    /// Leave-combat hook, called once the roster has moved the agent back to
    /// the idle set.
    fn leave_combat(&mut self);
}

/// Attack-budget cost of each attack type an agent can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackProfile {
    pub quick: u32,
    pub strong: u32,
    pub feint: u32,
}

impl AttackProfile {
    pub const fn new(quick: u32, strong: u32, feint: u32) -> Self {
        Self {
            quick,
            strong,
            feint,
        }
    }

    pub const fn score(&self, attack_type: AttackType) -> u32 {
        match attack_type {
            AttackType::Quick => self.quick,
            AttackType::Strong => self.strong,
            AttackType::Feint => self.feint,
        }
    }

    /// Picks one of the three attack types uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> (AttackType, u32) {
        let attack_type = match rng.random_range(0..3u8) {
            0 => AttackType::Quick,
            1 => AttackType::Strong,
            _ => AttackType::Feint,
        };
        (attack_type, self.score(attack_type))
    }
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self::new(2, 4, 1)
    }
}

/// Spawn description for an agent, as read from an agent catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentTemplate {
    /// Optional catalog label, used only for logging.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    pub position: Vec3,
    /// Point the agent protects while not engaged. Defaults to the spawn
    /// position.
    #[cfg_attr(feature = "serde", serde(default))]
    pub guard_post: Option<Vec3>,
    pub engagement_score: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_profile: AttackProfile,
    /// Patrol route walked while not engaged. Empty means hold the post.
    #[cfg_attr(feature = "serde", serde(default))]
    pub waypoints: Vec<Vec3>,
    /// Loop the route forever; otherwise walk it once and return to the post.
    #[cfg_attr(feature = "serde", serde(default = "patrol_continuous_default"))]
    pub patrol_continuous: bool,
}

#[cfg(feature = "serde")]
fn patrol_continuous_default() -> bool {
    true
}

impl AgentTemplate {
    pub fn new(position: Vec3, engagement_score: u32) -> Self {
        Self {
            name: None,
            position,
            guard_post: None,
            engagement_score,
            attack_profile: AttackProfile::default(),
            waypoints: Vec::new(),
            patrol_continuous: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_guard_post(mut self, guard_post: Vec3) -> Self {
        self.guard_post = Some(guard_post);
        self
    }

    #[must_use]
    pub fn with_attack_profile(mut self, attack_profile: AttackProfile) -> Self {
        self.attack_profile = attack_profile;
        self
    }

    #[must_use]
    pub fn with_waypoints(mut self, waypoints: impl IntoIterator<Item = Vec3>) -> Self {
        self.waypoints = waypoints.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_patrol_continuous(mut self, continuous: bool) -> Self {
        self.patrol_continuous = continuous;
        self
    }

    pub fn guard_post(&self) -> Vec3 {
        self.guard_post.unwrap_or(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn choose_returns_matching_score() {
        let profile = AttackProfile::new(1, 5, 3);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let (attack_type, score) = profile.choose(&mut rng);
            assert_eq!(profile.score(attack_type), score);
        }
    }

    #[test]
    fn guard_post_defaults_to_spawn() {
        let template = AgentTemplate::new(Vec3::new(10.0, 0.0, 0.0), 3);
        assert_eq!(template.guard_post(), Vec3::new(10.0, 0.0, 0.0));

        let template = template.with_guard_post(Vec3::ZERO);
        assert_eq!(template.guard_post(), Vec3::ZERO);
    }

    #[test]
    fn patrol_defaults_to_an_empty_looping_route() {
        let template = AgentTemplate::new(Vec3::ZERO, 1);
        assert!(template.waypoints.is_empty());
        assert!(template.patrol_continuous);

        let template = template
            .with_waypoints([Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)])
            .with_patrol_continuous(false);
        assert_eq!(template.waypoints.len(), 2);
        assert!(!template.patrol_continuous);
    }
}
