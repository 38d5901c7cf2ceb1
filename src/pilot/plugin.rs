//! # Gamepad Pilot Module
//!
//! The per-tick pipeline: read channels, translate movement and buttons,
//! consult the stabilize policy, and hand the resulting commands to the
//! caller for delivery.
//!
//! All plugin state lives in a single [`GamepadPilot`] instance owned by the
//! polling loop; nothing here is shared or process-wide.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{Config, Overrides};
use crate::input::ControllerSnapshot;

use super::channel::{AxisMapper, Channel};
use super::stabilize::{StabilizePolicy, TickOutcome};
use super::translator::{CommandTranslator, DroneAction, OutboundCommand};

/// The input-to-command core, evaluated once per poll tick.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
/// use gamepad_bridge::config::Config;
/// use gamepad_bridge::input::ControllerSnapshot;
/// use gamepad_bridge::pilot::GamepadPilot;
///
/// let mut pilot = GamepadPilot::new(Config::default());
/// let mut snapshot = ControllerSnapshot::default();
/// snapshot.set_axis(1, 0.55); // Pitch back
///
/// let commands = pilot.tick(&snapshot, Instant::now());
/// assert_eq!(commands.len(), 4); // One move command per channel
/// ```
#[derive(Debug)]
pub struct GamepadPilot {
    config: Config,
    policy: StabilizePolicy,
}

impl GamepadPilot {
    /// Creates a pilot from validated configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let policy = StabilizePolicy::from_config(&config.stabilize);
        Self { config, policy }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merges a server-sent partial configuration override.
    ///
    /// A malformed override is logged and discarded; the active
    /// configuration is never left half-applied.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        match self.config.apply_overrides(overrides) {
            Ok(()) => {
                self.policy.reconfigure(&self.config.stabilize);
                info!("Applied configuration override from server");
            }
            Err(e) => {
                warn!("Ignoring invalid configuration override: {}", e);
            }
        }
    }

    /// Runs one tick of the pipeline against a controller snapshot.
    ///
    /// Returns the commands to deliver this tick, in order: move commands
    /// (or the single stabilize stop), then button-bound commands.
    pub fn tick(&mut self, snapshot: &ControllerSnapshot, now: Instant) -> Vec<OutboundCommand> {
        let mapper = AxisMapper::new(&self.config.axes);
        let all_neutral = mapper.all_neutral(snapshot);

        let mut commands = Vec::new();

        match self.policy.on_tick(all_neutral, now) {
            TickOutcome::ForwardMoves => {
                let reads: Vec<_> = Channel::ALL
                    .iter()
                    .map(|&channel| {
                        (channel, mapper.read(channel, snapshot), mapper.config(channel))
                    })
                    .collect();
                commands.extend(CommandTranslator::translate_moves(&reads));
            }
            TickOutcome::EmitStop => {
                debug!("Input neutral, emitting stop");
                commands.push(OutboundCommand::Drone(DroneAction::Stop));
            }
            TickOutcome::Hold => {}
        }

        commands.extend(CommandTranslator::translate_buttons(snapshot, &self.config.buttons));
        commands
    }

    /// Suspends the pilot: cancels any pending stabilize countdown.
    ///
    /// Called when the last controller disconnects and on shutdown. The next
    /// snapshot resumes normal operation.
    pub fn suspend(&mut self) {
        self.policy.cancel();
    }
}
