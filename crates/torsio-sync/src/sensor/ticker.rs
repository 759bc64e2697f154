use std::time::{Duration, Instant};

/// Outcome of one [`Ticker::advance`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Tick {
    /// Deadlines that had already passed and were dropped.
    pub skipped: u64,
}

/// Fixed-rate deadline scheduler.
///
/// Deadlines sit on a fixed grid (`start + n * period`), so jitter in how late
/// a tick runs does not accumulate into drift. When the consumer falls behind
/// by whole periods, the missed deadlines are dropped instead of replayed.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Instant,
    skipped_total: u64,
}

impl Ticker {
    /// Shortest accepted period; shorter requests are raised to it.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    /// Ticker whose first deadline is `start`.
    pub fn starting_at(period: Duration, start: Instant) -> Self {
        Self {
            period: period.max(Self::MIN_PERIOD),
            next: start,
            skipped_total: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total deadlines dropped so far.
    pub fn skipped_total(&self) -> u64 {
        self.skipped_total
    }

    /// Time left until the next deadline (zero if it has passed).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Consumes the current deadline and schedules the next one after `now`.
    pub fn advance(&mut self, now: Instant) -> Tick {
        self.next += self.period;

        let mut skipped = 0;
        if self.next <= now {
            let behind = now.duration_since(self.next).as_nanos();
            let period = self.period.as_nanos();
            let periods = (behind / period + 1) as u64;
            skipped = periods;
            self.next += Duration::from_nanos((period as u64).saturating_mul(periods));
        }

        self.skipped_total = self.skipped_total.saturating_add(skipped);
        Tick { skipped }
    }
}
