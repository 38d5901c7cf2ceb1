//! # Channel Mapper Module
//!
//! Maps configured physical axis indices to the four logical control
//! channels.
//!
//! A logical channel is a control axis independent of physical input mapping:
//! which stick drives pitch is a property of the configuration, not of this
//! code. Reading a channel is a pure lookup with no error cases: an axis
//! index the controller does not expose reads as neutral.

use crate::config::{AxesConfig, AxisConfig};
use crate::input::ControllerSnapshot;

/// The four logical control channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Pitch,
    Roll,
    Yaw,
    Altitude,
}

impl Channel {
    /// All channels, in the order move commands are emitted.
    pub const ALL: [Channel; 4] = [Channel::Pitch, Channel::Roll, Channel::Yaw, Channel::Altitude];
}

/// Reads logical channel values out of a controller snapshot.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::config::AxesConfig;
/// use gamepad_bridge::input::ControllerSnapshot;
/// use gamepad_bridge::pilot::{AxisMapper, Channel};
///
/// let axes = AxesConfig::default();
/// let mut snapshot = ControllerSnapshot::default();
/// snapshot.set_axis(1, 0.55); // Default pitch axis
///
/// let mapper = AxisMapper::new(&axes);
/// assert!((mapper.read(Channel::Pitch, &snapshot) - 0.55).abs() < f32::EPSILON);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AxisMapper<'a> {
    axes: &'a AxesConfig,
}

impl<'a> AxisMapper<'a> {
    /// Creates a mapper over the given axis configuration.
    #[must_use]
    pub fn new(axes: &'a AxesConfig) -> Self {
        Self { axes }
    }

    /// Returns the axis configuration for a channel.
    #[must_use]
    pub fn config(&self, channel: Channel) -> &'a AxisConfig {
        match channel {
            Channel::Pitch => &self.axes.pitch,
            Channel::Roll => &self.axes.roll,
            Channel::Yaw => &self.axes.yaw,
            Channel::Altitude => &self.axes.altitude,
        }
    }

    /// Reads the signed control value for a channel.
    ///
    /// Looks up the configured axis index, reads the raw value from the
    /// snapshot (0.0 if absent) and negates it if the channel is inverted.
    #[must_use]
    pub fn read(&self, channel: Channel, snapshot: &ControllerSnapshot) -> f32 {
        let config = self.config(channel);
        let raw = snapshot.axis(config.axis);
        if config.invert { -raw } else { raw }
    }

    /// Whether every channel is within its dead zone.
    ///
    /// The boundary is inclusive: a magnitude equal to the dead zone scales
    /// to speed 0, so it counts as neutral. With a zero dead zone a centered
    /// stick must still read as neutral.
    #[must_use]
    pub fn all_neutral(&self, snapshot: &ControllerSnapshot) -> bool {
        Channel::ALL.iter().all(|&channel| {
            self.read(channel, snapshot).abs() <= self.config(channel).dead_zone
        })
    }
}
