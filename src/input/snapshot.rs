//! # Controller Snapshot Module
//!
//! Index-addressed, per-tick view of one connected controller.
//!
//! ## Index Layout
//!
//! Indices follow the browser standard gamepad mapping, so configuration
//! files can use the axis and button numbers browsers document:
//!
//! | Axis | Index | Description |
//! |------|-------|-------------|
//! | Left Stick X | 0 | -1 = left, 1 = right |
//! | Left Stick Y | 1 | -1 = up, 1 = down |
//! | Right Stick X | 2 | -1 = left, 1 = right |
//! | Right Stick Y | 3 | -1 = up, 1 = down |
//! | Left Trigger | 4 | 0 = released, 1 = pressed |
//! | Right Trigger | 5 | 0 = released, 1 = pressed |
//! | D-Pad X | 6 | -1/0/1 |
//! | D-Pad Y | 7 | -1/0/1 |
//!
//! Buttons 0..=16 run South, East, West, North, L1, R1, L2, R2, Select,
//! Start, left thumb, right thumb, d-pad up/down/left/right, Mode.
//!
//! Reads outside either range are neutral: a missing axis is 0.0 and a
//! missing button is not pressed. Mapping configuration can therefore
//! reference indices a given controller does not expose without failing.

/// Number of axis slots in a snapshot.
pub const AXIS_COUNT: usize = 8;

/// Number of button slots in a snapshot.
pub const BUTTON_COUNT: usize = 17;

/// State of a single button: pressed flag plus the analog value where the
/// hardware provides one (triggers report partial presses, digital buttons
/// report 0.0 or 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonState {
    pub pressed: bool,
    pub value: f32,
}

impl ButtonState {
    /// A fully pressed button.
    #[must_use]
    pub fn pressed() -> Self {
        Self { pressed: true, value: 1.0 }
    }
}

/// A snapshot of one controller, produced once per poll.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::input::ControllerSnapshot;
///
/// let snapshot = ControllerSnapshot::default();
/// assert_eq!(snapshot.axis(0), 0.0);
/// assert!(!snapshot.button_pressed(0));
/// // Out-of-range reads are neutral, not errors
/// assert_eq!(snapshot.axis(99), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    axes: [f32; AXIS_COUNT],
    buttons: [ButtonState; BUTTON_COUNT],
}

impl Default for ControllerSnapshot {
    fn default() -> Self {
        Self {
            axes: [0.0; AXIS_COUNT],
            buttons: [ButtonState::default(); BUTTON_COUNT],
        }
    }
}

impl ControllerSnapshot {
    /// Creates a snapshot with all axes centered and all buttons released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads an axis value; out-of-range indices read as neutral (0.0).
    #[must_use]
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Reads a button pressed flag; out-of-range indices read as released.
    #[must_use]
    pub fn button_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).map_or(false, |b| b.pressed)
    }

    /// Reads a button analog value; out-of-range indices read as 0.0.
    #[must_use]
    pub fn button_value(&self, index: usize) -> f32 {
        self.buttons.get(index).map_or(0.0, |b| b.value)
    }

    /// Writes an axis value, clamped to [-1, 1]. Out-of-range indices are
    /// ignored.
    pub fn set_axis(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.axes.get_mut(index) {
            *slot = value.clamp(-1.0, 1.0);
        }
    }

    /// Writes a button state. Out-of-range indices are ignored.
    pub fn set_button(&mut self, index: usize, state: ButtonState) {
        if let Some(slot) = self.buttons.get_mut(index) {
            *slot = state;
        }
    }
}
