//! # Pilot Module
//!
//! The input-to-command core of the bridge.
//!
//! This module handles:
//! - Reading configured physical axes into logical control channels
//! - Translating channel values into movement commands with dead zones and
//!   speed scaling
//! - Level-triggered button-to-command bindings
//! - The stabilize (stop-on-release) debounce state machine
//! - The per-tick pipeline tying the above together

pub mod channel;
pub mod plugin;
pub mod stabilize;
pub mod translator;

pub use channel::{AxisMapper, Channel};
pub use plugin::GamepadPilot;
pub use stabilize::{StabilizePolicy, StabilizeState, TickOutcome};
pub use translator::{CommandTranslator, DroneAction, MoveAction, MoveCommand, OutboundCommand};
