//! Writer Role
//!
//! The operator-facing side: synchronous command handlers over the
//! tracker core, and the async service that serializes them and drives
//! the match clock.

pub mod service;
pub mod surface;

pub use service::{ControlService, TrackerConfig};
pub use surface::{ControlSurface, ResetGate, RESET_PROMPT};
