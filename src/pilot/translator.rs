//! # Command Translator Module
//!
//! Converts logical channel values into directional move commands and button
//! state into discrete action commands.
//!
//! ## Movement
//!
//! Each channel has a fixed pair of direction names, chosen by the sign of
//! the control value:
//!
//! | Channel | Positive | Negative |
//! |---------|----------|----------|
//! | Pitch | back | front |
//! | Roll | right | left |
//! | Yaw | clockwise | counterClockwise |
//! | Altitude | down | up |
//!
//! Speed rescales the magnitude so the dead-zone boundary maps to 0 and full
//! deflection maps to `max_speed`. A zero-speed command is still emitted: it
//! is a meaningful "no movement on this axis" signal to the sink, distinct
//! from silence.
//!
//! ## Buttons
//!
//! Bindings are level-triggered: a held button re-emits its command every
//! tick. The receiving side treats repeated discrete commands as idempotent.

use serde_json::{json, Value};

use crate::config::{AxisConfig, ButtonConfig};
use crate::input::ControllerSnapshot;

use super::channel::Channel;

/// Directional movement actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    Back,
    Front,
    Right,
    Left,
    Clockwise,
    CounterClockwise,
    Down,
    Up,
}

impl MoveAction {
    /// Wire name of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveAction::Back => "back",
            MoveAction::Front => "front",
            MoveAction::Right => "right",
            MoveAction::Left => "left",
            MoveAction::Clockwise => "clockwise",
            MoveAction::CounterClockwise => "counterClockwise",
            MoveAction::Down => "down",
            MoveAction::Up => "up",
        }
    }

    /// The action pair for a channel, chosen by the control value's sign.
    #[must_use]
    pub fn for_channel(channel: Channel, positive: bool) -> Self {
        match (channel, positive) {
            (Channel::Pitch, true) => MoveAction::Back,
            (Channel::Pitch, false) => MoveAction::Front,
            (Channel::Roll, true) => MoveAction::Right,
            (Channel::Roll, false) => MoveAction::Left,
            (Channel::Yaw, true) => MoveAction::Clockwise,
            (Channel::Yaw, false) => MoveAction::CounterClockwise,
            (Channel::Altitude, true) => MoveAction::Down,
            (Channel::Altitude, false) => MoveAction::Up,
        }
    }
}

/// Discrete drone actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DroneAction {
    Takeoff,
    Land,
    Stop,
    DisableEmergency,
    FlatTrim,
}

impl DroneAction {
    /// Wire name of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DroneAction::Takeoff => "takeoff",
            DroneAction::Land => "land",
            DroneAction::Stop => "stop",
            DroneAction::DisableEmergency => "disableEmergency",
            DroneAction::FlatTrim => "flatTrim",
        }
    }
}

/// A directional move with a scaled speed.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCommand {
    pub action: MoveAction,
    pub speed: f32,
}

/// A named command with a JSON payload, ready for the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundCommand {
    Move(MoveCommand),
    Drone(DroneAction),
    /// Flip animation request.
    Animate,
    SwitchCams,
    Custom { command: String, payload: Value },
}

impl OutboundCommand {
    /// Outbound message name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            OutboundCommand::Move(_) => "/pilot/move",
            OutboundCommand::Drone(_) => "/pilot/drone",
            OutboundCommand::Animate => "/pilot/animate",
            OutboundCommand::SwitchCams => "/cockpit/switchCams",
            OutboundCommand::Custom { command, .. } => command,
        }
    }

    /// Outbound message payload.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            OutboundCommand::Move(cmd) => json!({
                "action": cmd.action.as_str(),
                "speed": cmd.speed,
            }),
            OutboundCommand::Drone(action) => json!({ "action": action.as_str() }),
            OutboundCommand::Animate => json!({ "action": "flipAhead" }),
            OutboundCommand::SwitchCams => json!({}),
            OutboundCommand::Custom { payload, .. } => payload.clone(),
        }
    }
}

/// Translates channel values and button state into outbound commands.
#[derive(Debug, Clone, Copy)]
pub struct CommandTranslator;

impl CommandTranslator {
    /// Rescales a raw control value to a speed.
    ///
    /// `|value| < dead_zone` yields exactly 0; otherwise the remaining range
    /// is rescaled so the dead-zone boundary maps to 0 and full deflection
    /// maps to `max_speed`.
    #[must_use]
    pub fn scaled_speed(value: f32, config: &AxisConfig) -> f32 {
        let magnitude = value.abs().min(1.0);
        if magnitude < config.dead_zone {
            0.0
        } else {
            (magnitude - config.dead_zone) / (1.0 - config.dead_zone) * config.max_speed
        }
    }

    /// Builds the move command for one channel.
    #[must_use]
    pub fn channel_move(channel: Channel, value: f32, config: &AxisConfig) -> MoveCommand {
        MoveCommand {
            action: MoveAction::for_channel(channel, value >= 0.0),
            speed: Self::scaled_speed(value, config),
        }
    }

    /// Translates the four channel values into one move command per channel.
    ///
    /// `reads` pairs each channel value with its axis configuration, in
    /// [`Channel::ALL`] order.
    #[must_use]
    pub fn translate_moves(reads: &[(Channel, f32, &AxisConfig)]) -> Vec<OutboundCommand> {
        reads
            .iter()
            .map(|&(channel, value, config)| {
                OutboundCommand::Move(Self::channel_move(channel, value, config))
            })
            .collect()
    }

    /// Evaluates button bindings against the snapshot.
    ///
    /// Fixed actions first, then custom commands in configured order. Every
    /// binding whose button is currently held emits its command this tick.
    #[must_use]
    pub fn translate_buttons(
        snapshot: &ControllerSnapshot,
        buttons: &ButtonConfig,
    ) -> Vec<OutboundCommand> {
        let mut commands = Vec::new();

        let fixed: [(usize, OutboundCommand); 7] = [
            (buttons.takeoff, OutboundCommand::Drone(DroneAction::Takeoff)),
            (buttons.land, OutboundCommand::Drone(DroneAction::Land)),
            (buttons.hover, OutboundCommand::Drone(DroneAction::Stop)),
            (buttons.disable_emergency, OutboundCommand::Drone(DroneAction::DisableEmergency)),
            (buttons.flat_trim, OutboundCommand::Drone(DroneAction::FlatTrim)),
            (buttons.flip, OutboundCommand::Animate),
            (buttons.switch_cams, OutboundCommand::SwitchCams),
        ];

        for (index, command) in fixed {
            if snapshot.button_pressed(index) {
                commands.push(command);
            }
        }

        for custom in &buttons.custom {
            if snapshot.button_pressed(custom.button) {
                commands.push(OutboundCommand::Custom {
                    command: custom.command.clone(),
                    payload: custom.payload.clone(),
                });
            }
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxesConfig, CustomCommand};
    use crate::input::ButtonState;

    fn axis(dead_zone: f32, max_speed: f32) -> AxisConfig {
        AxisConfig { axis: 0, invert: false, dead_zone, max_speed }
    }

    // ==================== Speed Scaling Tests ====================

    #[test]
    fn test_speed_zero_within_dead_zone() {
        let config = axis(0.1, 1.0);
        assert_eq!(CommandTranslator::scaled_speed(0.0, &config), 0.0);
        assert_eq!(CommandTranslator::scaled_speed(0.05, &config), 0.0);
        assert_eq!(CommandTranslator::scaled_speed(-0.09, &config), 0.0);
    }

    #[test]
    fn test_speed_at_full_deflection_is_max_speed() {
        let config = axis(0.1, 0.7);
        assert!((CommandTranslator::scaled_speed(1.0, &config) - 0.7).abs() < 1e-6);
        assert!((CommandTranslator::scaled_speed(-1.0, &config) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_speed_worked_example() {
        // dead_zone 0.1, max_speed 0.4, raw 0.55:
        // (0.55 - 0.1) / 0.9 = 0.5, scaled to 0.5 * 0.4 = 0.2
        let config = axis(0.1, 0.4);
        assert!((CommandTranslator::scaled_speed(0.55, &config) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_speed_continuous_at_dead_zone_boundary() {
        let config = axis(0.2, 1.0);
        let at_boundary = CommandTranslator::scaled_speed(0.2, &config);
        assert!(at_boundary.abs() < 1e-6);
    }

    #[test]
    fn test_speed_monotonic_over_magnitude() {
        let config = axis(0.1, 0.5);
        let mut previous = 0.0;
        for step in 0..=100 {
            let value = step as f32 / 100.0;
            let speed = CommandTranslator::scaled_speed(value, &config);
            assert!(speed >= previous, "speed decreased at |v| = {}", value);
            previous = speed;
        }
    }

    #[test]
    fn test_speed_with_zero_dead_zone() {
        let config = axis(0.0, 1.0);
        assert!((CommandTranslator::scaled_speed(0.5, &config) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_speed_clamps_overdeflection() {
        let config = axis(0.1, 1.0);
        let speed = CommandTranslator::scaled_speed(1.5, &config);
        assert!((speed - 1.0).abs() < 1e-6);
    }

    // ==================== Direction Tests ====================

    #[test]
    fn test_channel_direction_pairs() {
        assert_eq!(MoveAction::for_channel(Channel::Pitch, true), MoveAction::Back);
        assert_eq!(MoveAction::for_channel(Channel::Pitch, false), MoveAction::Front);
        assert_eq!(MoveAction::for_channel(Channel::Roll, true), MoveAction::Right);
        assert_eq!(MoveAction::for_channel(Channel::Roll, false), MoveAction::Left);
        assert_eq!(MoveAction::for_channel(Channel::Yaw, true), MoveAction::Clockwise);
        assert_eq!(MoveAction::for_channel(Channel::Yaw, false), MoveAction::CounterClockwise);
        assert_eq!(MoveAction::for_channel(Channel::Altitude, true), MoveAction::Down);
        assert_eq!(MoveAction::for_channel(Channel::Altitude, false), MoveAction::Up);
    }

    #[test]
    fn test_channel_move_negative_value() {
        let config = axis(0.1, 0.4);
        let command = CommandTranslator::channel_move(Channel::Pitch, -0.55, &config);
        assert_eq!(command.action, MoveAction::Front);
        assert!((command.speed - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_translate_moves_emits_one_command_per_channel() {
        let axes = AxesConfig::default();
        let reads = [
            (Channel::Pitch, 0.5, &axes.pitch),
            (Channel::Roll, 0.0, &axes.roll),
            (Channel::Yaw, 0.0, &axes.yaw),
            (Channel::Altitude, 0.0, &axes.altitude),
        ];
        let commands = CommandTranslator::translate_moves(&reads);

        // Zero-speed commands are emitted too
        assert_eq!(commands.len(), 4);
        match &commands[1] {
            OutboundCommand::Move(cmd) => {
                assert_eq!(cmd.action, MoveAction::Right);
                assert_eq!(cmd.speed, 0.0);
            }
            other => panic!("expected move command, got {:?}", other),
        }
    }

    // ==================== Wire Format Tests ====================

    #[test]
    fn test_move_command_wire_format() {
        let command = OutboundCommand::Move(MoveCommand {
            action: MoveAction::CounterClockwise,
            speed: 0.25,
        });
        assert_eq!(command.name(), "/pilot/move");
        assert_eq!(
            command.payload(),
            json!({ "action": "counterClockwise", "speed": 0.25 })
        );
    }

    #[test]
    fn test_drone_command_wire_format() {
        let command = OutboundCommand::Drone(DroneAction::DisableEmergency);
        assert_eq!(command.name(), "/pilot/drone");
        assert_eq!(command.payload(), json!({ "action": "disableEmergency" }));
    }

    #[test]
    fn test_animate_wire_format() {
        let command = OutboundCommand::Animate;
        assert_eq!(command.name(), "/pilot/animate");
        assert_eq!(command.payload(), json!({ "action": "flipAhead" }));
    }

    #[test]
    fn test_custom_wire_format() {
        let command = OutboundCommand::Custom {
            command: "/custom/led".to_string(),
            payload: json!({ "color": "red" }),
        };
        assert_eq!(command.name(), "/custom/led");
        assert_eq!(command.payload(), json!({ "color": "red" }));
    }

    // ==================== Button Binding Tests ====================

    #[test]
    fn test_no_buttons_pressed_emits_nothing() {
        let snapshot = ControllerSnapshot::default();
        let buttons = ButtonConfig::default();
        assert!(CommandTranslator::translate_buttons(&snapshot, &buttons).is_empty());
    }

    #[test]
    fn test_takeoff_button() {
        let buttons = ButtonConfig::default();
        let mut snapshot = ControllerSnapshot::default();
        snapshot.set_button(buttons.takeoff, ButtonState::pressed());

        let commands = CommandTranslator::translate_buttons(&snapshot, &buttons);
        assert_eq!(commands, vec![OutboundCommand::Drone(DroneAction::Takeoff)]);
    }

    #[test]
    fn test_hover_button_emits_stop() {
        let buttons = ButtonConfig::default();
        let mut snapshot = ControllerSnapshot::default();
        snapshot.set_button(buttons.hover, ButtonState::pressed());

        let commands = CommandTranslator::translate_buttons(&snapshot, &buttons);
        assert_eq!(commands, vec![OutboundCommand::Drone(DroneAction::Stop)]);
    }

    #[test]
    fn test_flip_button_emits_animate() {
        let buttons = ButtonConfig::default();
        let mut snapshot = ControllerSnapshot::default();
        snapshot.set_button(buttons.flip, ButtonState::pressed());

        let commands = CommandTranslator::translate_buttons(&snapshot, &buttons);
        assert_eq!(commands, vec![OutboundCommand::Animate]);
    }

    #[test]
    fn test_multiple_buttons_fixed_order() {
        let buttons = ButtonConfig::default();
        let mut snapshot = ControllerSnapshot::default();
        snapshot.set_button(buttons.land, ButtonState::pressed());
        snapshot.set_button(buttons.flat_trim, ButtonState::pressed());

        let commands = CommandTranslator::translate_buttons(&snapshot, &buttons);
        assert_eq!(
            commands,
            vec![
                OutboundCommand::Drone(DroneAction::Land),
                OutboundCommand::Drone(DroneAction::FlatTrim),
            ]
        );
    }

    #[test]
    fn test_custom_commands_after_fixed_in_list_order() {
        let mut buttons = ButtonConfig::default();
        buttons.custom = vec![
            CustomCommand {
                button: 11,
                command: "/custom/second".to_string(),
                payload: Value::Null,
            },
            CustomCommand {
                button: 10,
                command: "/custom/first".to_string(),
                payload: Value::Null,
            },
        ];

        let mut snapshot = ControllerSnapshot::default();
        snapshot.set_button(buttons.hover, ButtonState::pressed());
        snapshot.set_button(10, ButtonState::pressed());
        snapshot.set_button(11, ButtonState::pressed());

        let commands = CommandTranslator::translate_buttons(&snapshot, &buttons);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], OutboundCommand::Drone(DroneAction::Stop));
        assert_eq!(commands[1].name(), "/custom/second");
        assert_eq!(commands[2].name(), "/custom/first");
    }

    #[test]
    fn test_unbound_button_index_never_fires() {
        let mut buttons = ButtonConfig::default();
        buttons.takeoff = 99; // Controller has no such button

        let mut snapshot = ControllerSnapshot::default();
        snapshot.set_button(9, ButtonState::pressed());

        let commands = CommandTranslator::translate_buttons(&snapshot, &buttons);
        assert!(commands.is_empty());
    }
}
