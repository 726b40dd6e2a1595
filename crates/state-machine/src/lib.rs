//! Tick-driven finite state machine with deferred transitions.
//!
//! Each machine owns exactly one current state and at most one pending
//! state. Transitions are never applied while a state is running: a state
//! returns [`Transition::Switch`] (or an outside caller uses
//! [`StateMachine::request`]) and the swap happens after the current state's
//! tick has completed.
//!
//! - **Generic context**: states read and write a caller-supplied `C`
//! - **No back-references**: states never hold a handle to their machine
//! - **Zero dependencies**: pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`State`]: lifecycle trait (`enter`, `tick`, `exit`)
//! - [`Transition`]: what a state wants after its tick
//! - [`StateMachine`]: owner of the current/pending pair

pub mod machine;
pub mod state;
pub mod transition;

pub use machine::StateMachine;
pub use state::State;
pub use transition::Transition;
