//! Owner of the current/pending state pair.

use crate::{State, Transition};

/// A finite state machine with deferred transitions.
///
/// # Tick protocol
///
/// 1. Tick the current state (if any).
/// 2. If it returned [`Transition::Switch`], that state becomes pending,
///    replacing any earlier request.
/// 3. If a state is pending: `exit` the current state, drop it, make the
///    pending state current and `enter` it.
///
/// A freshly built machine holds its initial state as pending, so the first
/// tick enters it without ticking anything.
pub struct StateMachine<C> {
    current: Option<Box<dyn State<C>>>,
    pending: Option<Box<dyn State<C>>>,
}

impl<C> StateMachine<C> {
    /// Creates a machine that will enter `initial` on its first tick.
    pub fn new(initial: Box<dyn State<C>>) -> Self {
        Self {
            current: None,
            pending: Some(initial),
        }
    }

    /// Schedules `next` to replace the current state at the end of the next
    /// tick. A later request overwrites an earlier one.
    pub fn request(&mut self, next: Box<dyn State<C>>) {
        self.pending = Some(next);
    }

    /// Runs one tick. Returns the name of the state entered during this tick,
    /// if a swap happened.
    pub fn tick(&mut self, ctx: &mut C, dt: f32) -> Option<&'static str> {
        if let Some(current) = self.current.as_mut() {
            if let Transition::Switch(next) = current.tick(ctx, dt) {
                self.pending = Some(next);
            }
        }
        self.apply_pending(ctx)
    }

    /// Exits the current state and discards any pending one.
    pub fn stop(&mut self, ctx: &mut C) {
        self.pending = None;
        if let Some(mut current) = self.current.take() {
            current.exit(ctx);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|state| state.name())
    }

    pub fn pending_name(&self) -> Option<&'static str> {
        self.pending.as_ref().map(|state| state.name())
    }

    fn apply_pending(&mut self, ctx: &mut C) -> Option<&'static str> {
        let mut next = self.pending.take()?;
        if let Some(mut previous) = self.current.take() {
            previous.exit(ctx);
        }
        next.enter(ctx);
        let name = next.name();
        self.current = Some(next);
        Some(name)
    }
}

impl<C> std::fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_name())
            .field("pending", &self.pending_name())
            .finish()
    }
}
