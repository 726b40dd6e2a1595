/// A bounded pool of score points.
///
/// `available` never exceeds `maximum`; releases beyond the maximum are
/// clamped so a double release cannot inflate the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Budget {
    available: u32,
    maximum: u32,
}

impl Budget {
    pub const fn full(maximum: u32) -> Self {
        Self {
            available: maximum,
            maximum,
        }
    }

    #[inline]
    pub const fn available(&self) -> u32 {
        self.available
    }

    #[inline]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    #[inline]
    pub const fn in_use(&self) -> u32 {
        self.maximum - self.available
    }

    #[inline]
    pub const fn can_afford(&self, score: u32) -> bool {
        score <= self.available
    }

    /// Takes `score` from the pool. Returns `false` and leaves the pool
    /// untouched if it does not fit.
    pub fn try_reserve(&mut self, score: u32) -> bool {
        if !self.can_afford(score) {
            return false;
        }
        self.available -= score;
        true
    }

    /// Returns `score` to the pool, clamped at the maximum. Returns the amount
    /// that was discarded by the clamp.
    pub fn release(&mut self, score: u32) -> u32 {
        let restored = self.available.saturating_add(score);
        let overflow = restored.saturating_sub(self.maximum);
        self.available = restored.min(self.maximum);
        overflow
    }

    pub fn refill(&mut self) {
        self.available = self.maximum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_fails_without_side_effects() {
        let mut budget = Budget::full(5);
        assert!(budget.try_reserve(4));
        assert!(!budget.try_reserve(2));
        assert_eq!(budget.available(), 1);
        assert_eq!(budget.in_use(), 4);
    }

    #[test]
    fn release_is_clamped() {
        let mut budget = Budget::full(10);
        assert!(budget.try_reserve(3));
        assert_eq!(budget.release(3), 0);
        assert_eq!(budget.release(3), 3);
        assert_eq!(budget.available(), 10);
    }

    #[test]
    fn zero_score_always_fits() {
        let mut budget = Budget::full(0);
        assert!(budget.try_reserve(0));
        assert_eq!(budget.available(), 0);
    }
}
