//! Quiet-period debounce as explicit timer state.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet period before confirmed addresses are written out.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1500);

/// Coalesces bursts of triggers into one firing per quiet period.
///
/// Every [`schedule`](Self::schedule) resets the deadline to `now + quiet_period`;
/// the state fires once no trigger arrived for a full quiet period.
#[derive(Debug, Clone)]
pub struct Debounce {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debounce {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Arm or extend the timer. Returns `true` if it was idle.
    pub fn schedule(&mut self, now: Instant) -> bool {
        let was_idle = self.deadline.is_none();
        self.deadline = Some(now + self.quiet_period);
        was_idle
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarm and return `true` if the deadline has passed.
    pub fn take_if_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
