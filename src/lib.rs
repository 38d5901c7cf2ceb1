//! # Gamepad Bridge Library
//!
//! Pilot your drone with a gamepad over a WebSocket cockpit connection.
//!
//! This library provides the core functionality for translating polled gamepad
//! axis/button state into drone movement and action commands and forwarding
//! them to a remote drone controller.

pub mod config;
pub mod error;
pub mod input;
pub mod pilot;
pub mod sink;
