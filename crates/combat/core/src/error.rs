//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors ([`FormationError`](crate::FormationError),
//! [`RosterError`](crate::RosterError), [`ConfigError`](crate::ConfigError))
//! live next to the subsystems that raise them. This module holds the shared
//! classification used by callers to decide how loudly to report a failure.
//!
//! No error here is fatal: every failing operation leaves state unchanged.

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Capacity rejected. May succeed later once budget or slots free up.
    ///
    /// Examples: engagement budget exhausted, attack budget exhausted
    Recoverable,

    /// Invalid state request. Should not be retried without a state change.
    ///
    /// Examples: dead agent asked to join combat, agent already engaged
    Validation,

    /// Desync between registries. Indicates a bookkeeping bug upstream.
    ///
    /// Examples: removing an agent that holds no slot, unregistered agent
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
