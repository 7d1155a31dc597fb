//! Shared slide state and its live fan-out to viewers.
//!
//! The producer replaces the slide through [`Broadcaster::update`]; every
//! connected viewer is pushed the new value. New viewers receive the current
//! slide as soon as they connect.

pub mod broadcaster;
pub mod lifecycle;
pub mod registry;
pub mod state;
pub mod types;

pub use broadcaster::*;
pub use lifecycle::*;
pub use registry::*;
pub use state::*;
pub use types::*;
