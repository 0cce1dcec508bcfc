use std::time::{Duration, Instant};

use tracing::warn;

pub const REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Fixed-cadence schedule for refreshing the display.
pub struct Ticker {
    period: Duration,
    next_tick: Instant,
    ticks: u64,
    skipped: u64,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    pub fn starting_at(period: Duration, first_tick: Instant) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_tick: first_tick,
            ticks: 0,
            skipped: 0,
        }
    }

    /// Returns true once per elapsed period; missed periods are dropped, not replayed.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next_tick {
            return false;
        }

        let backlog = now.saturating_duration_since(self.next_tick);
        let missed = (backlog.as_nanos() / self.period.as_nanos()) as u64;
        if missed > 0 {
            self.skipped = self.skipped.saturating_add(missed);
            warn!(missed, "display refresh fell behind");
        }
        self.next_tick += self.period * (missed as u32 + 1);
        self.ticks += 1;
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_tick.saturating_duration_since(now)
    }

    /// Blocks until the next tick is due and consumes it.
    pub fn wait(&mut self) {
        sleep_until(self.next_tick);
        let _ = self.due(Instant::now());
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

pub fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if now >= deadline {
        return;
    }
    std::thread::sleep(deadline.saturating_duration_since(now));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_due_immediately() {
        let start = Instant::now();
        let mut ticker = Ticker::starting_at(REFRESH_PERIOD, start);
        assert!(ticker.due(start));
        assert!(!ticker.due(start + Duration::from_millis(500)));
        assert!(ticker.due(start + REFRESH_PERIOD));
        assert_eq!(ticker.ticks(), 2);
        assert_eq!(ticker.skipped(), 0);
    }

    #[test]
    fn missed_periods_are_counted_and_skipped() {
        let start = Instant::now();
        let mut ticker = Ticker::starting_at(REFRESH_PERIOD, start);
        assert!(ticker.due(start + Duration::from_millis(3_500)));
        assert_eq!(ticker.skipped(), 3);
        assert_eq!(
            ticker.until_next(start + Duration::from_millis(3_500)),
            Duration::from_millis(500)
        );
        assert!(!ticker.due(start + Duration::from_millis(3_900)));
    }

    #[test]
    fn wait_blocks_until_deadline() {
        let period = Duration::from_millis(30);
        let start = Instant::now();
        let mut ticker = Ticker::starting_at(period, start + period);
        ticker.wait();
        assert!(start.elapsed() >= period);
        assert_eq!(ticker.ticks(), 1);
    }
}
