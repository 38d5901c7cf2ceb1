//! # Gamepad Source Module
//!
//! Polled gamepad input backed by `gilrs`, with hot-plug support.
//!
//! `gilrs` is not `Send`, so the event pump runs on a dedicated OS thread.
//! The thread folds events into one [`ControllerSnapshot`] per connected pad
//! and publishes the set through a `tokio::sync::watch` channel; the polling
//! loop reads the latest set once per tick without blocking.

use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::snapshot::{ButtonState, ControllerSnapshot};

/// Analog button value at which a trigger counts as pressed.
const TRIGGER_THRESHOLD: f32 = 0.5;

/// Event pump sleep between batches, to avoid busy-waiting.
const PUMP_INTERVAL: Duration = Duration::from_millis(4);

/// A polled source of controller snapshots.
///
/// The bridge core consumes snapshots through this trait; production uses
/// [`GilrsSource`], tests substitute scripted snapshots.
pub trait InputSource {
    /// Returns the latest snapshot for every connected controller.
    ///
    /// An empty vector means no controller is connected.
    fn poll(&mut self) -> Vec<ControllerSnapshot>;
}

/// `gilrs`-backed input source.
pub struct GilrsSource {
    snapshots: watch::Receiver<Vec<ControllerSnapshot>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl GilrsSource {
    /// Starts the event pump thread and returns the source handle.
    #[must_use]
    pub fn start() -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(Vec::new());
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        std::thread::spawn(move || {
            Self::event_loop_blocking(snapshot_tx, shutdown_rx);
        });

        Self {
            snapshots: snapshot_rx,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Requests the event pump thread to stop.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
            info!("Gamepad source shutdown requested");
        }
    }

    /// Main event loop (runs in a dedicated blocking thread).
    fn event_loop_blocking(
        snapshot_tx: watch::Sender<Vec<ControllerSnapshot>>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        // Initialize gilrs in this thread (not Send-safe)
        let mut gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("gilrs initialized");
                g
            }
            Err(e) => {
                warn!("Failed to initialize gilrs: {:?}", e);
                return;
            }
        };

        let mut pads: Vec<(GamepadId, ControllerSnapshot)> = gilrs
            .gamepads()
            .filter(|(_, gp)| gp.is_connected())
            .map(|(id, gp)| {
                info!("Gamepad detected at startup: {:?} \"{}\"", id, gp.name());
                (id, ControllerSnapshot::default())
            })
            .collect();

        if pads.is_empty() {
            info!("No gamepads connected; waiting for hot-plug");
        }
        Self::publish(&snapshot_tx, &pads);

        loop {
            match shutdown_rx.try_recv() {
                Ok(_) | Err(mpsc::error::TryRecvError::Disconnected) => {
                    info!("Gamepad source shutting down");
                    break;
                }
                Err(mpsc::error::TryRecvError::Empty) => {}
            }

            let mut changed = false;
            while let Some(Event { id, event, .. }) = gilrs.next_event() {
                changed |= Self::handle_event(&gilrs, &mut pads, id, event);
            }

            if changed {
                Self::publish(&snapshot_tx, &pads);
            }

            std::thread::sleep(PUMP_INTERVAL);
        }
    }

    /// Folds one gilrs event into the pad set. Returns whether any snapshot
    /// changed.
    fn handle_event(
        gilrs: &Gilrs,
        pads: &mut Vec<(GamepadId, ControllerSnapshot)>,
        id: GamepadId,
        event: EventType,
    ) -> bool {
        match event {
            EventType::Connected => {
                if pads.iter().all(|(pad_id, _)| *pad_id != id) {
                    info!("Gamepad connected: \"{}\"", gilrs.gamepad(id).name());
                    pads.push((id, ControllerSnapshot::default()));
                }
                true
            }
            EventType::Disconnected => {
                info!("Gamepad disconnected: {:?}", id);
                pads.retain(|(pad_id, _)| *pad_id != id);
                true
            }
            _ => match pads.iter_mut().find(|(pad_id, _)| *pad_id == id) {
                Some((_, snapshot)) => match event {
                    EventType::AxisChanged(axis, value, _) => fold_axis(snapshot, axis, value),
                    EventType::ButtonPressed(button, _) => fold_button(snapshot, button, true),
                    EventType::ButtonReleased(button, _) => fold_button(snapshot, button, false),
                    EventType::ButtonChanged(button, value, _) => {
                        fold_button_value(snapshot, button, value)
                    }
                    _ => false,
                },
                None => {
                    debug!("Event from unregistered gamepad {:?} ignored", id);
                    false
                }
            },
        }
    }

    fn publish(tx: &watch::Sender<Vec<ControllerSnapshot>>, pads: &[(GamepadId, ControllerSnapshot)]) {
        let snapshots = pads.iter().map(|(_, s)| s.clone()).collect();
        if tx.send(snapshots).is_err() {
            debug!("Snapshot receiver dropped");
        }
    }
}

impl InputSource for GilrsSource {
    fn poll(&mut self) -> Vec<ControllerSnapshot> {
        self.snapshots.borrow().clone()
    }
}

impl Drop for GilrsSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Folds an axis change into a snapshot. Returns whether it changed.
fn fold_axis(snapshot: &mut ControllerSnapshot, axis: Axis, value: f32) -> bool {
    if let Some((index, stored)) = axis_index(axis, value) {
        snapshot.set_axis(index, stored);
        return true;
    }
    false
}

/// Folds a digital button press/release into a snapshot.
fn fold_button(snapshot: &mut ControllerSnapshot, button: Button, pressed: bool) -> bool {
    if let Some(index) = button_index(button) {
        let value = if pressed { 1.0 } else { 0.0 };
        snapshot.set_button(index, ButtonState { pressed, value });
        return true;
    }
    false
}

/// Folds an analog button change (triggers) into a snapshot.
fn fold_button_value(snapshot: &mut ControllerSnapshot, button: Button, value: f32) -> bool {
    if let Some(index) = button_index(button) {
        snapshot.set_button(
            index,
            ButtonState { pressed: value >= TRIGGER_THRESHOLD, value },
        );
        return true;
    }
    false
}

/// Maps a gilrs axis to the standard snapshot index and adjusts the sign.
///
/// gilrs reports stick Y up-positive; the snapshot follows the convention the
/// channel mapping was written against, where down is positive.
fn axis_index(axis: Axis, value: f32) -> Option<(usize, f32)> {
    match axis {
        Axis::LeftStickX => Some((0, value)),
        Axis::LeftStickY => Some((1, -value)),
        Axis::RightStickX => Some((2, value)),
        Axis::RightStickY => Some((3, -value)),
        Axis::LeftZ => Some((4, value)),
        Axis::RightZ => Some((5, value)),
        Axis::DPadX => Some((6, value)),
        Axis::DPadY => Some((7, -value)),
        _ => None,
    }
}

/// Maps a gilrs button to the standard snapshot index (0 = South .. 16 = Mode).
fn button_index(button: Button) -> Option<usize> {
    match button {
        Button::South => Some(0),
        Button::East => Some(1),
        Button::West => Some(2),
        Button::North => Some(3),
        Button::LeftTrigger => Some(4),
        Button::RightTrigger => Some(5),
        Button::LeftTrigger2 => Some(6),
        Button::RightTrigger2 => Some(7),
        Button::Select => Some(8),
        Button::Start => Some(9),
        Button::LeftThumb => Some(10),
        Button::RightThumb => Some(11),
        Button::DPadUp => Some(12),
        Button::DPadDown => Some(13),
        Button::DPadLeft => Some(14),
        Button::DPadRight => Some(15),
        Button::Mode => Some(16),
        _ => None,
    }
}
