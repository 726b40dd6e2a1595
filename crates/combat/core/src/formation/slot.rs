use crate::types::{AgentId, Vec3};

/// One of the eight anchor points around the player.
///
/// Variant order is the enumeration order used to break nearest-slot ties.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CircleSlot {
    Front,
    FrontRight,
    Right,
    BackRight,
    Back,
    BackLeft,
    Left,
    FrontLeft,
}

impl CircleSlot {
    pub const ALL: [CircleSlot; 8] = [
        CircleSlot::Front,
        CircleSlot::FrontRight,
        CircleSlot::Right,
        CircleSlot::BackRight,
        CircleSlot::Back,
        CircleSlot::BackLeft,
        CircleSlot::Left,
        CircleSlot::FrontLeft,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Un-normalized direction in the player's frame (x forward, y right).
    pub const fn direction(self) -> Vec3 {
        let (x, y) = match self {
            CircleSlot::Front => (1.0, 0.0),
            CircleSlot::FrontRight => (1.0, 1.0),
            CircleSlot::Right => (0.0, 1.0),
            CircleSlot::BackRight => (-1.0, 1.0),
            CircleSlot::Back => (-1.0, 0.0),
            CircleSlot::BackLeft => (-1.0, -1.0),
            CircleSlot::Left => (0.0, -1.0),
            CircleSlot::FrontLeft => (1.0, -1.0),
        };
        Vec3::new(x, y, 0.0)
    }
}

/// Agent holding a slot together with the score it paid to get in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotOccupant {
    pub agent: AgentId,
    pub engagement_score: u32,
}

/// A circle slot: fixed scaled offset, cached world location, occupant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub kind: CircleSlot,
    /// Normalized direction scaled by the slot radius.
    pub offset: Vec3,
    /// `center + offset` as of the last location refresh.
    pub location: Vec3,
    pub occupant: Option<SlotOccupant>,
}

impl Slot {
    pub(crate) fn new(kind: CircleSlot, radius: f32, center: Vec3) -> Self {
        let offset = kind.direction().normalized() * radius;
        Self {
            kind,
            offset,
            location: center + offset,
            occupant: None,
        }
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    #[inline]
    pub fn is_held_by(&self, agent: AgentId) -> bool {
        self.occupant.is_some_and(|o| o.agent == agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn all_matches_enumeration_order() {
        let iterated: Vec<_> = CircleSlot::iter().collect();
        assert_eq!(iterated, CircleSlot::ALL.to_vec());
        for (i, slot) in CircleSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn offsets_sit_on_the_radius() {
        for kind in CircleSlot::ALL {
            let slot = Slot::new(kind, 150.0, Vec3::ZERO);
            assert!((slot.offset.length() - 150.0).abs() < 1e-3, "{kind}");
        }
    }

    #[test]
    fn opposite_slots_mirror_each_other() {
        let front = Slot::new(CircleSlot::Front, 100.0, Vec3::ZERO);
        let back = Slot::new(CircleSlot::Back, 100.0, Vec3::ZERO);
        assert_eq!(front.offset + back.offset, Vec3::ZERO);
    }
}
