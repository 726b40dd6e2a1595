//! Unified error types surfaced by the runtime API.
//!
//! Wraps formation, roster and configuration failures so hosts can branch on
//! one type and still read the underlying severity.
use thiserror::Error;

use combat_core::{AgentId, CombatError, ConfigError, ErrorSeverity, FormationError, RosterError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("agent {agent} has no controller")]
    UnknownAgent { agent: AgentId },

    #[error("agent {agent} is dead")]
    AgentDead { agent: AgentId },

    #[error("agent {agent} already has an attack in flight")]
    AttackInFlight { agent: AgentId },

    #[error("agent {agent} has no attack in flight")]
    NoAttackInFlight { agent: AgentId },

    #[error("agent table is full ({len} records)")]
    AgentTableFull { len: usize },

    #[error(transparent)]
    Formation(#[from] FormationError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("invalid arena configuration")]
    Config(#[from] ConfigError),
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownAgent { .. } => ErrorSeverity::Internal,
            Self::AgentTableFull { .. } => ErrorSeverity::Recoverable,
            Self::AgentDead { .. }
            | Self::AttackInFlight { .. }
            | Self::NoAttackInFlight { .. } => ErrorSeverity::Validation,
            Self::Formation(err) => err.severity(),
            Self::Roster(err) => err.severity(),
            Self::Config(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAgent { .. } => "RUNTIME_UNKNOWN_AGENT",
            Self::AgentTableFull { .. } => "RUNTIME_AGENT_TABLE_FULL",
            Self::AgentDead { .. } => "RUNTIME_AGENT_DEAD",
            Self::AttackInFlight { .. } => "RUNTIME_ATTACK_IN_FLIGHT",
            Self::NoAttackInFlight { .. } => "RUNTIME_NO_ATTACK_IN_FLIGHT",
            Self::Formation(err) => err.error_code(),
            Self::Roster(err) => err.error_code(),
            Self::Config(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_severity() {
        let err = RuntimeError::from(FormationError::EngagementBudgetExceeded {
            agent: AgentId(1),
            requested: 6,
            available: 1,
        });
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert_eq!(err.error_code(), "FORMATION_ENGAGEMENT_BUDGET_EXCEEDED");

        let err = RuntimeError::from(RosterError::NotRegistered { agent: AgentId(2) });
        assert!(err.severity().is_internal());
    }
}
