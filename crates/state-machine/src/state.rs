//! Core state trait.
//!
//! A [`State`] is one behavioral mode of an owner. The trait is generic over
//! a context type `C` through which the state observes and drives its owner.

use crate::Transition;

/// One state of a [`StateMachine`](crate::StateMachine).
pub trait State<C>: Send {
    /// Stable name, used for logging and assertions.
    fn name(&self) -> &'static str;

    /// Called once when the state becomes current.
    fn enter(&mut self, _ctx: &mut C) {}

    /// Advances the state by `dt` seconds.
    ///
    /// # Returns
    ///
    /// - `Transition::Stay` to remain in this state
    /// - `Transition::Switch(next)` to schedule `next`; the swap is applied
    ///   by the machine after this call returns
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Transition<C>;

    /// Called once when the state stops being current, before it is dropped.
    fn exit(&mut self, _ctx: &mut C) {}
}

/// Blanket implementation for boxed states.
impl<C> State<C> for Box<dyn State<C>> {
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn enter(&mut self, ctx: &mut C) {
        (**self).enter(ctx)
    }

    #[inline]
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Transition<C> {
        (**self).tick(ctx, dt)
    }

    #[inline]
    fn exit(&mut self, ctx: &mut C) {
        (**self).exit(ctx)
    }
}
