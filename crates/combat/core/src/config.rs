use crate::error::{CombatError, ErrorSeverity};

/// Host-settable tuning for the attack circle and the attack predictor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Total engagement score that may hold circle slots at once.
    pub max_engagement_budget: u32,
    /// Total attack score that may be in flight at once.
    pub max_attack_budget: u32,
    /// Distance of every slot from the player, in centimetres.
    pub slot_radius: f32,
    /// Number of recent attack ids kept for pattern matching.
    pub history_capacity: usize,
    /// Multiplier applied to recent-history matches when predicting.
    pub history_weight: u32,
    /// Probability that an agent trusts the attack it was told about.
    pub prediction_trust: f32,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Number of directional slots around the player.
    pub const SLOT_COUNT: usize = 8;
    /// Smallest history able to hold a (prev2, prev1, next) pattern.
    pub const MIN_HISTORY_CAPACITY: usize = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ENGAGEMENT_BUDGET: u32 = 10;
    pub const DEFAULT_MAX_ATTACK_BUDGET: u32 = 10;
    pub const DEFAULT_SLOT_RADIUS: f32 = 150.0;
    pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
    pub const DEFAULT_HISTORY_WEIGHT: u32 = 2;
    pub const DEFAULT_PREDICTION_TRUST: f32 = 0.8;

    pub fn new() -> Self {
        Self {
            max_engagement_budget: Self::DEFAULT_MAX_ENGAGEMENT_BUDGET,
            max_attack_budget: Self::DEFAULT_MAX_ATTACK_BUDGET,
            slot_radius: Self::DEFAULT_SLOT_RADIUS,
            history_capacity: Self::DEFAULT_HISTORY_CAPACITY,
            history_weight: Self::DEFAULT_HISTORY_WEIGHT,
            prediction_trust: Self::DEFAULT_PREDICTION_TRUST,
        }
    }

    #[must_use]
    pub fn with_engagement_budget(mut self, budget: u32) -> Self {
        self.max_engagement_budget = budget;
        self
    }

    #[must_use]
    pub fn with_attack_budget(mut self, budget: u32) -> Self {
        self.max_attack_budget = budget;
        self
    }

    #[must_use]
    pub fn with_slot_radius(mut self, radius: f32) -> Self {
        self.slot_radius = radius;
        self
    }

    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_history_weight(mut self, weight: u32) -> Self {
        self.history_weight = weight;
        self
    }

    #[must_use]
    pub fn with_prediction_trust(mut self, trust: f32) -> Self {
        self.prediction_trust = trust;
        self
    }

    /// Rejects values the formation and predictor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.slot_radius.is_finite() || self.slot_radius <= 0.0 {
            return Err(ConfigError::InvalidSlotRadius(self.slot_radius));
        }
        if self.history_capacity < Self::MIN_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryTooSmall {
                capacity: self.history_capacity,
                minimum: Self::MIN_HISTORY_CAPACITY,
            });
        }
        if !(0.0..=1.0).contains(&self.prediction_trust) {
            return Err(ConfigError::InvalidPredictionTrust(self.prediction_trust));
        }
        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration values rejected by [`CombatConfig::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("slot radius must be a positive finite distance (got {0})")]
    InvalidSlotRadius(f32),

    #[error("history capacity {capacity} is below the minimum of {minimum}")]
    HistoryTooSmall { capacity: usize, minimum: usize },

    #[error("prediction trust must lie within [0, 1] (got {0})")]
    InvalidPredictionTrust(f32),
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSlotRadius(_) => "CONFIG_INVALID_SLOT_RADIUS",
            Self::HistoryTooSmall { .. } => "CONFIG_HISTORY_TOO_SMALL",
            Self::InvalidPredictionTrust(_) => "CONFIG_INVALID_PREDICTION_TRUST",
        }
    }
}
