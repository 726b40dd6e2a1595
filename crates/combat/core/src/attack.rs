//! Player attack encoding.
//!
//! Every player attack is one of nine swing directions combined with one of
//! three attack types. The pair is packed into a single [`AttackId`] in
//! `[0, 27)` so that attack sequences can be counted and predicted:
//!
//! ```text
//! id        = type_index * 9 + direction_index
//! direction = id % 9
//! type      = id / 9
//! ```

use std::fmt;

use rand::Rng;
use strum::EnumCount;

use crate::types::AgentId;

/// Direction of a player swing.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum AttackDirection {
    DownwardRightSlash = 0,
    DownwardLeftSlash = 1,
    UpwardRightSlash = 2,
    UpwardLeftSlash = 3,
    RightSlash = 4,
    LeftSlash = 5,
    DownwardSlash = 6,
    UpwardSlash = 7,
    Thrust = 8,
}

impl AttackDirection {
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Kind of player attack. Drives which reaction an agent attempts.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum AttackType {
    Quick = 0,
    Strong = 1,
    Feint = 2,
}

impl AttackType {
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Packed (direction, type) identifier in `[0, 27)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackId(u8);

impl AttackId {
    /// Number of distinct attack ids.
    pub const COUNT: usize = AttackDirection::COUNT * AttackType::COUNT;

    const DIRECTIONS: u8 = AttackDirection::COUNT as u8;

    /// Returns `None` when `raw` is outside `[0, 27)`.
    pub const fn new(raw: u8) -> Option<Self> {
        if (raw as usize) < Self::COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub const fn encode(direction: AttackDirection, attack_type: AttackType) -> Self {
        Self(attack_type.index() * Self::DIRECTIONS + direction.index())
    }

    /// Draws an id uniformly from the full 27-value space.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(0..Self::COUNT as u8))
    }

    /// Iterates all ids in ascending order.
    pub fn all() -> impl Iterator<Item = AttackId> {
        (0..Self::COUNT as u8).map(AttackId)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn direction(self) -> AttackDirection {
        // id % 9 is always a valid discriminant
        AttackDirection::from_repr(self.0 % Self::DIRECTIONS)
            .unwrap_or(AttackDirection::DownwardRightSlash)
    }

    pub fn attack_type(self) -> AttackType {
        AttackType::from_repr(self.0 / Self::DIRECTIONS).unwrap_or(AttackType::Quick)
    }

    pub fn decode(self) -> (AttackDirection, AttackType) {
        (self.direction(), self.attack_type())
    }
}

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.0, self.attack_type(), self.direction())
    }
}

/// A player attack as reported by the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerAttack {
    pub direction: AttackDirection,
    pub attack_type: AttackType,
    /// Agent the swing is aimed at.
    pub target: AgentId,
}

impl PlayerAttack {
    pub const fn new(direction: AttackDirection, attack_type: AttackType, target: AgentId) -> Self {
        Self {
            direction,
            attack_type,
            target,
        }
    }

    #[inline]
    pub const fn id(&self) -> AttackId {
        AttackId::encode(self.direction, self.attack_type)
    }
}
