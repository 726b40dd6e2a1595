//! Result of ticking a state.

use crate::State;

/// What a state asks of its machine after a tick.
pub enum Transition<C> {
    /// Keep the current state.
    Stay,
    /// Replace the current state with the given one.
    Switch(Box<dyn State<C>>),
}

impl<C> Transition<C> {
    /// Shorthand for `Transition::Switch(Box::new(state))`.
    pub fn to(state: impl State<C> + 'static) -> Self {
        Transition::Switch(Box::new(state))
    }

    /// Returns `true` if this is `Stay`.
    #[inline]
    pub fn is_stay(&self) -> bool {
        matches!(self, Transition::Stay)
    }

    /// Returns `true` if this is `Switch`.
    #[inline]
    pub fn is_switch(&self) -> bool {
        matches!(self, Transition::Switch(_))
    }
}

impl<C> std::fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Stay => f.write_str("Stay"),
            Transition::Switch(next) => f.debug_tuple("Switch").field(&next.name()).finish(),
        }
    }
}
