//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files, and merging
//! partial overrides pushed by the cockpit server after connecting.
//!
//! Axis-to-channel assignment and the various tuning constants (dead zones,
//! speed scaling, stabilize delay) are deliberately configuration rather than
//! code: different controllers disagree on which physical axis drives which
//! logical channel.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub socket: SocketConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub axes: AxesConfig,

    #[serde(default)]
    pub buttons: ButtonConfig,

    #[serde(default)]
    pub stabilize: StabilizeConfig,
}

/// Cockpit WebSocket connection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SocketConfig {
    #[serde(default = "default_socket_url")]
    pub url: String,

    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,
}

/// Polling loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,
}

/// Mapping from a physical axis index to one logical control channel.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AxisConfig {
    /// Physical axis index in the controller snapshot.
    #[serde(default)]
    pub axis: usize,

    /// Negate the raw reading before translation.
    #[serde(default)]
    pub invert: bool,

    /// Minimum input magnitude below which the channel is neutral. Must be
    /// in [0, 1): a dead zone of 1 would suppress all input.
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,

    /// Speed emitted at full deflection. Must be positive.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
}

/// Axis configuration for all four logical channels
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AxesConfig {
    #[serde(default = "default_pitch_axis")]
    pub pitch: AxisConfig,

    #[serde(default = "default_roll_axis")]
    pub roll: AxisConfig,

    #[serde(default = "default_yaw_axis")]
    pub yaw: AxisConfig,

    #[serde(default = "default_altitude_axis")]
    pub altitude: AxisConfig,
}

/// Fixed action button bindings plus the custom command list
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ButtonConfig {
    #[serde(default = "default_takeoff_button")]
    pub takeoff: usize,

    #[serde(default = "default_land_button")]
    pub land: usize,

    #[serde(default = "default_flip_button")]
    pub flip: usize,

    #[serde(default = "default_hover_button")]
    pub hover: usize,

    #[serde(default = "default_disable_emergency_button")]
    pub disable_emergency: usize,

    #[serde(default = "default_flat_trim_button")]
    pub flat_trim: usize,

    #[serde(default = "default_switch_cams_button")]
    pub switch_cams: usize,

    /// Custom commands, evaluated after the fixed bindings in list order.
    #[serde(default)]
    pub custom: Vec<CustomCommand>,
}

/// A user-defined button-to-command binding
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CustomCommand {
    pub button: usize,

    /// Outbound message name, e.g. `/custom/led`.
    pub command: String,

    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Auto-stabilize (stop-on-release) configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StabilizeConfig {
    #[serde(default = "default_stabilize_enabled")]
    pub enabled: bool,

    /// Debounce delay between all channels going neutral and the single
    /// stop command being emitted.
    #[serde(default = "default_stabilize_delay_ms")]
    pub delay_ms: u64,
}

// Default value functions
fn default_socket_url() -> String { "ws://127.0.0.1:3001/cockpit".to_string() }
fn default_reconnect_interval_ms() -> u64 { 1000 }

fn default_rate_hz() -> u32 { 60 }

fn default_dead_zone() -> f32 { 0.1 }
fn default_max_speed() -> f32 { 1.0 }

// Standard gamepad layout: left stick X/Y drive roll/pitch, right stick X/Y
// drive yaw/altitude.
fn default_roll_axis() -> AxisConfig {
    AxisConfig { axis: 0, invert: false, dead_zone: default_dead_zone(), max_speed: default_max_speed() }
}
fn default_pitch_axis() -> AxisConfig {
    AxisConfig { axis: 1, invert: false, dead_zone: default_dead_zone(), max_speed: default_max_speed() }
}
fn default_yaw_axis() -> AxisConfig {
    AxisConfig { axis: 2, invert: false, dead_zone: default_dead_zone(), max_speed: default_max_speed() }
}
fn default_altitude_axis() -> AxisConfig {
    AxisConfig { axis: 3, invert: false, dead_zone: default_dead_zone(), max_speed: default_max_speed() }
}

// Standard gamepad layout button indices (0 = South/A .. 16 = Mode).
fn default_takeoff_button() -> usize { 9 }
fn default_land_button() -> usize { 8 }
fn default_flip_button() -> usize { 3 }
fn default_hover_button() -> usize { 0 }
fn default_disable_emergency_button() -> usize { 1 }
fn default_flat_trim_button() -> usize { 4 }
fn default_switch_cams_button() -> usize { 2 }

fn default_stabilize_enabled() -> bool { true }
fn default_stabilize_delay_ms() -> u64 { 150 }

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            url: default_socket_url(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { rate_hz: default_rate_hz() }
    }
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            pitch: default_pitch_axis(),
            roll: default_roll_axis(),
            yaw: default_yaw_axis(),
            altitude: default_altitude_axis(),
        }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            takeoff: default_takeoff_button(),
            land: default_land_button(),
            flip: default_flip_button(),
            hover: default_hover_button(),
            disable_emergency: default_disable_emergency_button(),
            flat_trim: default_flat_trim_button(),
            switch_cams: default_switch_cams_button(),
            custom: Vec::new(),
        }
    }
}

impl Default for StabilizeConfig {
    fn default() -> Self {
        Self {
            enabled: default_stabilize_enabled(),
            delay_ms: default_stabilize_delay_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket: SocketConfig::default(),
            poll: PollConfig::default(),
            axes: AxesConfig::default(),
            buttons: ButtonConfig::default(),
            stabilize: StabilizeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.socket.url.is_empty() {
            return Err(crate::error::GamepadBridgeError::Config(
                toml::de::Error::custom("socket url cannot be empty")
            ));
        }

        if !self.socket.url.starts_with("ws://") && !self.socket.url.starts_with("wss://") {
            return Err(crate::error::GamepadBridgeError::Config(
                toml::de::Error::custom("socket url must use the ws:// or wss:// scheme")
            ));
        }

        if self.socket.reconnect_interval_ms == 0 || self.socket.reconnect_interval_ms > 60000 {
            return Err(crate::error::GamepadBridgeError::Config(
                toml::de::Error::custom("reconnect_interval_ms must be between 1 and 60000")
            ));
        }

        if self.poll.rate_hz == 0 || self.poll.rate_hz > 240 {
            return Err(crate::error::GamepadBridgeError::Config(
                toml::de::Error::custom("poll rate_hz must be between 1 and 240")
            ));
        }

        for (name, axis) in [
            ("pitch", &self.axes.pitch),
            ("roll", &self.axes.roll),
            ("yaw", &self.axes.yaw),
            ("altitude", &self.axes.altitude),
        ] {
            if !(0.0..1.0).contains(&axis.dead_zone) {
                return Err(crate::error::GamepadBridgeError::Config(
                    toml::de::Error::custom(format!("{} dead_zone must be in [0.0, 1.0)", name))
                ));
            }

            if !axis.max_speed.is_finite() || axis.max_speed <= 0.0 {
                return Err(crate::error::GamepadBridgeError::Config(
                    toml::de::Error::custom(format!("{} max_speed must be greater than 0", name))
                ));
            }
        }

        for custom in &self.buttons.custom {
            if custom.command.is_empty() {
                return Err(crate::error::GamepadBridgeError::Config(
                    toml::de::Error::custom("custom command name cannot be empty")
                ));
            }
        }

        if self.stabilize.delay_ms > 10000 {
            return Err(crate::error::GamepadBridgeError::Config(
                toml::de::Error::custom("stabilize delay_ms must be at most 10000")
            ));
        }

        Ok(())
    }

    /// Merge a partial override into this configuration.
    ///
    /// Provided keys overwrite the current values wholesale; absent keys keep
    /// their current values. The merged result is validated before it is
    /// committed, so a malformed override leaves the configuration untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the merged configuration fails validation.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<()> {
        let mut merged = self.clone();

        if let Some(axes) = &overrides.axes {
            if let Some(pitch) = &axes.pitch {
                merged.axes.pitch = pitch.clone();
            }
            if let Some(roll) = &axes.roll {
                merged.axes.roll = roll.clone();
            }
            if let Some(yaw) = &axes.yaw {
                merged.axes.yaw = yaw.clone();
            }
            if let Some(altitude) = &axes.altitude {
                merged.axes.altitude = altitude.clone();
            }
        }

        if let Some(buttons) = &overrides.buttons {
            if let Some(takeoff) = buttons.takeoff {
                merged.buttons.takeoff = takeoff;
            }
            if let Some(land) = buttons.land {
                merged.buttons.land = land;
            }
            if let Some(flip) = buttons.flip {
                merged.buttons.flip = flip;
            }
            if let Some(hover) = buttons.hover {
                merged.buttons.hover = hover;
            }
            if let Some(disable_emergency) = buttons.disable_emergency {
                merged.buttons.disable_emergency = disable_emergency;
            }
            if let Some(flat_trim) = buttons.flat_trim {
                merged.buttons.flat_trim = flat_trim;
            }
            if let Some(switch_cams) = buttons.switch_cams {
                merged.buttons.switch_cams = switch_cams;
            }
            if let Some(custom) = &buttons.custom {
                merged.buttons.custom = custom.clone();
            }
        }

        if let Some(stabilize) = &overrides.stabilize {
            if let Some(enabled) = stabilize.enabled {
                merged.stabilize.enabled = enabled;
            }
            if let Some(delay_ms) = stabilize.delay_ms {
                merged.stabilize.delay_ms = delay_ms;
            }
        }

        merged.validate()?;
        *self = merged;
        Ok(())
    }
}

/// Partial configuration override, delivered once per connection by the
/// cockpit server. Unknown keys are ignored during deserialization.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Overrides {
    #[serde(default)]
    pub axes: Option<AxesOverrides>,

    #[serde(default)]
    pub buttons: Option<ButtonOverrides>,

    #[serde(default)]
    pub stabilize: Option<StabilizeOverrides>,
}

/// Per-channel axis overrides. A provided channel replaces the whole
/// [`AxisConfig`]; fields absent from the provided table fall back to
/// defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AxesOverrides {
    #[serde(default)]
    pub pitch: Option<AxisConfig>,

    #[serde(default)]
    pub roll: Option<AxisConfig>,

    #[serde(default)]
    pub yaw: Option<AxisConfig>,

    #[serde(default)]
    pub altitude: Option<AxisConfig>,
}

/// Button binding overrides
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ButtonOverrides {
    #[serde(default)]
    pub takeoff: Option<usize>,

    #[serde(default)]
    pub land: Option<usize>,

    #[serde(default)]
    pub flip: Option<usize>,

    #[serde(default)]
    pub hover: Option<usize>,

    #[serde(default)]
    pub disable_emergency: Option<usize>,

    #[serde(default)]
    pub flat_trim: Option<usize>,

    #[serde(default)]
    pub switch_cams: Option<usize>,

    #[serde(default)]
    pub custom: Option<Vec<CustomCommand>>,
}

/// Auto-stabilize overrides
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StabilizeOverrides {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub delay_ms: Option<u64>,
}
