//! # Input Module
//!
//! Gamepad input handling.
//!
//! This module handles:
//! - Per-tick controller snapshots with index-addressed axes and buttons
//! - Gamepad detection and hot-plug via `gilrs`
//! - Publishing the latest state to the polling loop

pub mod gamepad;
pub mod snapshot;

pub use gamepad::{GilrsSource, InputSource};
pub use snapshot::{ButtonState, ControllerSnapshot};
