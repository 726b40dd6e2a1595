//! Public runtime API surface.
//!
//! The host contract and error types live here so the controller and arena
//! modules stay focused on coordination.

pub mod errors;
pub mod host;

pub use errors::{Result, RuntimeError};
pub use host::CombatHost;
