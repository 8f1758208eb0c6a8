use std::time::{Duration, Instant};

/// Default video tick period.
pub const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Fixed-period, self-rescheduling timer for the frame loop.
///
/// Each tick re-arms the timer at `now + period` once the tick's work is
/// done, whatever that work produced. Lateness is never made up: a slow
/// tick pushes every later tick back rather than triggering catch-up frames.
#[derive(Clone, Debug)]
pub struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    /// A cadence that fires immediately, then every `period`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self { period, next: now }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the next tick is due.
    pub fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Time left until the next tick (zero if already due).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Schedule the next tick one period after `now`.
    pub fn rearm(&mut self, now: Instant) {
        self.next = now + self.period;
    }

    pub fn next_deadline(&self) -> Instant {
        self.next
    }
}
