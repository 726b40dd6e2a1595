use crate::error::{CombatError, ErrorSeverity};
use crate::types::AgentId;

/// Errors raised by the combat roster.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("agent {agent} is not registered with the roster")]
    NotRegistered { agent: AgentId },

    #[error("agent {agent} is dead")]
    AgentDead { agent: AgentId },

    #[error("agent {agent} is already engaged in combat")]
    AlreadyEngaged { agent: AgentId },

    #[error("agent {agent} is not engaged in combat")]
    NotEngaged { agent: AgentId },
}

impl CombatError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotRegistered { .. } => ErrorSeverity::Internal,
            Self::AgentDead { .. } | Self::AlreadyEngaged { .. } | Self::NotEngaged { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotRegistered { .. } => "ROSTER_NOT_REGISTERED",
            Self::AgentDead { .. } => "ROSTER_AGENT_DEAD",
            Self::AlreadyEngaged { .. } => "ROSTER_ALREADY_ENGAGED",
            Self::NotEngaged { .. } => "ROSTER_NOT_ENGAGED",
        }
    }
}
