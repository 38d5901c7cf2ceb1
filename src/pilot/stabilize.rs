//! # Stabilize Policy Module
//!
//! Stop-on-release debounce state machine.
//!
//! Once the sticks return to neutral the drone should be told to stop, but
//! not with a stop command every tick, and not before a short debounce delay
//! has confirmed the release was deliberate. The policy guarantees:
//!
//! - while input is non-neutral, move commands flow;
//! - on release, no stop is emitted before the configured delay;
//! - exactly one stop is emitted at/after the delay if input stays neutral;
//! - input resuming before the deadline cancels the pending stop entirely.
//!
//! The countdown is a deadline checked on the owning poll task rather than an
//! independent timer callback: the tick task is the single serialized owner
//! of this state, so at most one countdown can ever be in flight and arming
//! always replaces any prior deadline.

use std::time::{Duration, Instant};

use crate::config::StabilizeConfig;

/// Policy states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizeState {
    /// Not moving, no countdown pending.
    Idle,
    /// Non-neutral input present.
    Moving,
    /// Input went neutral; countdown armed.
    Stabilizing,
}

/// What the caller should do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Non-neutral input: forward translated move commands to the sink.
    ForwardMoves,
    /// Neutral input, nothing due this tick.
    Hold,
    /// Emit exactly one stop command.
    EmitStop,
}

/// Stop-on-release state machine, evaluated once per poll tick.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use gamepad_bridge::pilot::{StabilizePolicy, TickOutcome};
///
/// let mut policy = StabilizePolicy::new(true, Duration::from_millis(150));
/// let t0 = Instant::now();
///
/// assert_eq!(policy.on_tick(false, t0), TickOutcome::ForwardMoves);
/// // Release: countdown armed, no stop yet
/// assert_eq!(policy.on_tick(true, t0), TickOutcome::Hold);
/// // Deadline passed: exactly one stop
/// assert_eq!(
///     policy.on_tick(true, t0 + Duration::from_millis(150)),
///     TickOutcome::EmitStop
/// );
/// assert_eq!(
///     policy.on_tick(true, t0 + Duration::from_millis(200)),
///     TickOutcome::Hold
/// );
/// ```
#[derive(Debug)]
pub struct StabilizePolicy {
    enabled: bool,
    delay: Duration,
    state: StabilizeState,
    deadline: Option<Instant>,
}

impl StabilizePolicy {
    /// Creates a policy in the idle state.
    #[must_use]
    pub fn new(enabled: bool, delay: Duration) -> Self {
        Self {
            enabled,
            delay,
            state: StabilizeState::Idle,
            deadline: None,
        }
    }

    /// Creates a policy from configuration.
    #[must_use]
    pub fn from_config(config: &StabilizeConfig) -> Self {
        Self::new(config.enabled, Duration::from_millis(config.delay_ms))
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> StabilizeState {
        self.state
    }

    /// Updates enabled/delay from configuration. A pending countdown keeps
    /// its already-armed deadline.
    pub fn reconfigure(&mut self, config: &StabilizeConfig) {
        self.enabled = config.enabled;
        self.delay = Duration::from_millis(config.delay_ms);
    }

    /// Cancels any pending countdown and returns to idle.
    ///
    /// Called when the plugin stops or the last controller disconnects.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.state = StabilizeState::Idle;
    }

    /// Advances the machine one tick.
    pub fn on_tick(&mut self, all_neutral: bool, now: Instant) -> TickOutcome {
        if !all_neutral {
            // Fresh input preempts any pending stop
            self.deadline = None;
            self.state = StabilizeState::Moving;
            return TickOutcome::ForwardMoves;
        }

        match self.state {
            StabilizeState::Idle => TickOutcome::Hold,
            StabilizeState::Moving => {
                if !self.enabled {
                    // Degenerate mode: stop on the first neutral tick
                    self.state = StabilizeState::Idle;
                    return TickOutcome::EmitStop;
                }
                self.state = StabilizeState::Stabilizing;
                self.deadline = Some(now + self.delay);
                // A zero delay fires on the arming tick itself
                self.check_deadline(now)
            }
            StabilizeState::Stabilizing => self.check_deadline(now),
        }
    }

    fn check_deadline(&mut self, now: Instant) -> TickOutcome {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.state = StabilizeState::Idle;
                TickOutcome::EmitStop
            }
            Some(_) => TickOutcome::Hold,
            None => {
                self.state = StabilizeState::Idle;
                TickOutcome::Hold
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(150);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn moving_policy(t0: Instant) -> StabilizePolicy {
        let mut policy = StabilizePolicy::new(true, DELAY);
        assert_eq!(policy.on_tick(false, t0), TickOutcome::ForwardMoves);
        policy
    }

    // ==================== Transition Tests ====================

    #[test]
    fn test_starts_idle() {
        let policy = StabilizePolicy::new(true, DELAY);
        assert_eq!(policy.state(), StabilizeState::Idle);
    }

    #[test]
    fn test_idle_neutral_stays_idle() {
        let mut policy = StabilizePolicy::new(true, DELAY);
        assert_eq!(policy.on_tick(true, Instant::now()), TickOutcome::Hold);
        assert_eq!(policy.state(), StabilizeState::Idle);
    }

    #[test]
    fn test_input_moves_and_forwards() {
        let mut policy = StabilizePolicy::new(true, DELAY);
        assert_eq!(policy.on_tick(false, Instant::now()), TickOutcome::ForwardMoves);
        assert_eq!(policy.state(), StabilizeState::Moving);
    }

    #[test]
    fn test_release_arms_countdown_without_stop() {
        let t0 = Instant::now();
        let mut policy = moving_policy(t0);

        assert_eq!(policy.on_tick(true, t0 + ms(10)), TickOutcome::Hold);
        assert_eq!(policy.state(), StabilizeState::Stabilizing);
    }

    #[test]
    fn test_no_stop_before_delay() {
        let t0 = Instant::now();
        let mut policy = moving_policy(t0);

        policy.on_tick(true, t0);
        // Neutral ticks inside the 150ms window never emit
        for offset in [16, 50, 100, 149] {
            assert_eq!(policy.on_tick(true, t0 + ms(offset)), TickOutcome::Hold);
        }
    }

    #[test]
    fn test_exactly_one_stop_at_deadline() {
        let t0 = Instant::now();
        let mut policy = moving_policy(t0);

        policy.on_tick(true, t0);
        assert_eq!(policy.on_tick(true, t0 + ms(150)), TickOutcome::EmitStop);
        assert_eq!(policy.state(), StabilizeState::Idle);

        // Further neutral ticks emit nothing
        assert_eq!(policy.on_tick(true, t0 + ms(166)), TickOutcome::Hold);
        assert_eq!(policy.on_tick(true, t0 + ms(1000)), TickOutcome::Hold);
    }

    #[test]
    fn test_resumed_input_cancels_pending_stop() {
        let t0 = Instant::now();
        let mut policy = moving_policy(t0);

        policy.on_tick(true, t0);
        // Input resumes at 100ms, before the 150ms deadline
        assert_eq!(policy.on_tick(false, t0 + ms(100)), TickOutcome::ForwardMoves);
        assert_eq!(policy.state(), StabilizeState::Moving);

        // The canceled countdown never fires: the next release re-arms from
        // its own tick time
        assert_eq!(policy.on_tick(true, t0 + ms(120)), TickOutcome::Hold);
        assert_eq!(policy.on_tick(true, t0 + ms(200)), TickOutcome::Hold);
        assert_eq!(policy.on_tick(true, t0 + ms(270)), TickOutcome::EmitStop);
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let t0 = Instant::now();
        let mut policy = moving_policy(t0);

        // Release, resume, release again: only the latest deadline counts
        policy.on_tick(true, t0);
        policy.on_tick(false, t0 + ms(50));
        policy.on_tick(true, t0 + ms(60));
        assert_eq!(policy.on_tick(true, t0 + ms(160)), TickOutcome::Hold);
        assert_eq!(policy.on_tick(true, t0 + ms(210)), TickOutcome::EmitStop);
    }

    #[test]
    fn test_disabled_stops_on_first_neutral_tick() {
        let t0 = Instant::now();
        let mut policy = StabilizePolicy::new(false, DELAY);

        policy.on_tick(false, t0);
        assert_eq!(policy.on_tick(true, t0 + ms(16)), TickOutcome::EmitStop);
        assert_eq!(policy.state(), StabilizeState::Idle);
        assert_eq!(policy.on_tick(true, t0 + ms(33)), TickOutcome::Hold);
    }

    #[test]
    fn test_zero_delay_fires_on_arming_tick() {
        let t0 = Instant::now();
        let mut policy = StabilizePolicy::new(true, Duration::ZERO);

        policy.on_tick(false, t0);
        assert_eq!(policy.on_tick(true, t0 + ms(16)), TickOutcome::EmitStop);
    }

    #[test]
    fn test_cancel_discards_pending_countdown() {
        let t0 = Instant::now();
        let mut policy = moving_policy(t0);

        policy.on_tick(true, t0);
        assert_eq!(policy.state(), StabilizeState::Stabilizing);

        policy.cancel();
        assert_eq!(policy.state(), StabilizeState::Idle);
        assert_eq!(policy.on_tick(true, t0 + ms(500)), TickOutcome::Hold);
    }

    #[test]
    fn test_reconfigure_keeps_armed_deadline() {
        let t0 = Instant::now();
        let mut policy = moving_policy(t0);
        policy.on_tick(true, t0);

        policy.reconfigure(&StabilizeConfig { enabled: true, delay_ms: 1000 });
        // The already-armed 150ms deadline still applies
        assert_eq!(policy.on_tick(true, t0 + ms(150)), TickOutcome::EmitStop);
    }
}
