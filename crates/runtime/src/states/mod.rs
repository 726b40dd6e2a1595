//! Built-in agent behaviors.
//!
//! - [`GuardState`]: hold the guard post until the player is seen
//! - [`AlertState`]: close in on the player and ask to join combat
//! - [`AttackState`]: hold the circle slot and attack on an interval
//!
//! States only touch the [`Blackboard`](crate::Blackboard); circle and roster
//! changes go through queued [`Intent`](crate::Intent)s.

mod alert;
mod attack;
mod guard;

pub use alert::AlertState;
pub use attack::AttackState;
pub use guard::GuardState;
