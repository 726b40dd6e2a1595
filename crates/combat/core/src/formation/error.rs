use crate::error::{CombatError, ErrorSeverity};
use crate::types::AgentId;

/// Errors raised by the attack circle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormationError {
    #[error("agent {agent} needs {requested} engagement score but only {available} is available")]
    EngagementBudgetExceeded {
        agent: AgentId,
        requested: u32,
        available: u32,
    },

    #[error("attack needs {requested} attack score but only {available} is available")]
    AttackBudgetExceeded { requested: u32, available: u32 },

    #[error("agent {agent} fits the engagement budget but every slot is taken")]
    NoFreeSlot { agent: AgentId },

    #[error("agent {agent} already holds a slot in the circle")]
    AlreadyInCircle { agent: AgentId },

    #[error("agent {agent} is not currently in the circle")]
    NotInCircle { agent: AgentId },
}

impl CombatError for FormationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EngagementBudgetExceeded { .. }
            | Self::AttackBudgetExceeded { .. }
            | Self::NoFreeSlot { .. } => ErrorSeverity::Recoverable,
            Self::AlreadyInCircle { .. } => ErrorSeverity::Validation,
            Self::NotInCircle { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EngagementBudgetExceeded { .. } => "FORMATION_ENGAGEMENT_BUDGET_EXCEEDED",
            Self::AttackBudgetExceeded { .. } => "FORMATION_ATTACK_BUDGET_EXCEEDED",
            Self::NoFreeSlot { .. } => "FORMATION_NO_FREE_SLOT",
            Self::AlreadyInCircle { .. } => "FORMATION_ALREADY_IN_CIRCLE",
            Self::NotInCircle { .. } => "FORMATION_NOT_IN_CIRCLE",
        }
    }
}
