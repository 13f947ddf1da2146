//! Auto-expiry countdown state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Auto-expiry countdown attached to the displayed invite.
///
/// Pure state machine: the one-second cadence is supplied by the driver in
/// `services::expiry`, which keeps this type trivially unit-testable.
pub enum Countdown {
    /// No invite is displayed.
    #[default]
    Idle,
    /// An invite is displayed and counting down.
    Running {
        /// Seconds left before auto-dismissal.
        remaining: u32,
    },
    /// The countdown reached zero.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Observation produced by advancing the countdown one second.
pub enum Tick {
    /// Nothing is counting down.
    Idle,
    /// Still running with this many seconds left.
    Running(u32),
    /// Just hit zero; the displayed invite must be dismissed.
    Expired,
}

impl Countdown {
    /// Restart the countdown at `seconds`, whatever the previous state.
    pub fn start(&mut self, seconds: u32) {
        *self = if seconds == 0 {
            Countdown::Expired
        } else {
            Countdown::Running { remaining: seconds }
        };
    }

    /// Return to idle because nothing is displayed anymore.
    pub fn clear(&mut self) {
        *self = Countdown::Idle;
    }

    /// Whether a countdown is in progress.
    pub fn is_running(&self) -> bool {
        matches!(self, Countdown::Running { .. })
    }

    /// Seconds left, when running.
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Countdown::Running { remaining } => Some(*remaining),
            _ => None,
        }
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> Tick {
        match self {
            Countdown::Idle => Tick::Idle,
            Countdown::Expired => Tick::Expired,
            Countdown::Running { remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    *self = Countdown::Expired;
                    Tick::Expired
                } else {
                    Tick::Running(*remaining)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_expiry() {
        let mut countdown = Countdown::default();
        countdown.start(3);

        assert_eq!(countdown.tick(), Tick::Running(2));
        assert_eq!(countdown.tick(), Tick::Running(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown, Countdown::Expired);
    }

    #[test]
    fn restart_resets_remaining_regardless_of_prior_value() {
        let mut countdown = Countdown::default();
        countdown.start(30);
        countdown.tick();
        countdown.tick();
        assert_eq!(countdown.remaining(), Some(28));

        countdown.start(30);
        assert_eq!(countdown.remaining(), Some(30));

        countdown.clear();
        countdown.start(30);
        assert_eq!(countdown.remaining(), Some(30));
    }

    #[test]
    fn idle_and_cleared_countdowns_do_not_tick() {
        let mut countdown = Countdown::default();
        assert_eq!(countdown.tick(), Tick::Idle);

        countdown.start(5);
        countdown.clear();
        assert_eq!(countdown.tick(), Tick::Idle);
        assert!(!countdown.is_running());
    }

    #[test]
    fn starting_at_zero_expires_immediately() {
        let mut countdown = Countdown::default();
        countdown.start(0);
        assert_eq!(countdown, Countdown::Expired);
        assert_eq!(countdown.tick(), Tick::Expired);
    }
}
