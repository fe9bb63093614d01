use std::time::{Duration, Instant};

/// Most ticks an [`IntervalTicker`] reports for a single poll. A stalled
/// terminal resumes at normal speed instead of replaying every missed tick.
const MAX_CATCH_UP: u32 = 4;

/// Periodic scheduling capability driving the simulation while it plays.
///
/// The event loop polls [`Ticker::due_ticks`] cooperatively, so a tick can never
/// start while another is still running.
pub trait Ticker {
    /// Begin (or restart) periodic ticking at `interval`
    fn start(&mut self, interval: Duration);
    /// Cancel ticking and drop anything pending. Idempotent.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    /// Ticks that came due since the last poll; always 0 when stopped
    fn due_ticks(&mut self) -> u32;
}

/// Wall-clock ticker
#[derive(Debug, Default)]
pub struct IntervalTicker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left until the next tick, if running
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_due
            .map(|due| due.saturating_duration_since(Instant::now()))
    }

    fn due_at(&mut self, now: Instant) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }

        let behind = now.duration_since(due).as_nanos();
        let periods = behind / self.interval.as_nanos().max(1) + 1;
        if periods > MAX_CATCH_UP as u128 {
            self.next_due = Some(now + self.interval);
            MAX_CATCH_UP
        } else {
            let periods = periods as u32;
            self.next_due = Some(due + self.interval * periods);
            periods
        }
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self, interval: Duration) {
        self.interval = interval.max(Duration::from_millis(1));
        self.next_due = Some(Instant::now() + self.interval);
    }

    fn stop(&mut self) {
        self.next_due = None;
    }

    fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    fn due_ticks(&mut self) -> u32 {
        self.due_at(Instant::now())
    }
}

/// Ticker that only fires when told to
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualTicker {
    interval: Option<Duration>,
    pending: u32,
}

#[cfg(test)]
impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `n` ticks. Ignored while stopped, like a cancelled timer.
    pub fn fire(&mut self, n: u32) {
        if self.interval.is_some() {
            self.pending += n;
        }
    }

    /// Interval passed to the last `start`, while running
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

#[cfg(test)]
impl Ticker for ManualTicker {
    fn start(&mut self, interval: Duration) {
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        self.interval = None;
        self.pending = 0;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    fn due_ticks(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_ticker_counts_elapsed_periods() {
        let mut ticker = IntervalTicker::new();
        ticker.start(Duration::from_millis(100));
        let due = ticker.next_due.unwrap();

        assert_eq!(ticker.due_at(due - Duration::from_millis(1)), 0);
        assert_eq!(ticker.due_at(due), 1);
        assert_eq!(ticker.next_due, Some(due + Duration::from_millis(100)));
        assert_eq!(ticker.due_at(due + Duration::from_millis(250)), 2);
        assert_eq!(ticker.next_due, Some(due + Duration::from_millis(300)));
    }

    #[test]
    fn test_interval_ticker_caps_catch_up() {
        let mut ticker = IntervalTicker::new();
        ticker.start(Duration::from_millis(10));
        let due = ticker.next_due.unwrap();
        let late = due + Duration::from_secs(5);

        assert_eq!(ticker.due_at(late), MAX_CATCH_UP);
        assert_eq!(ticker.next_due, Some(late + Duration::from_millis(10)));
    }

    #[test]
    fn test_interval_ticker_stop_is_idempotent() {
        let mut ticker = IntervalTicker::new();
        ticker.stop();
        assert!(!ticker.is_running());

        ticker.start(Duration::from_millis(1));
        assert!(ticker.is_running());
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!(ticker.due_at(Instant::now() + Duration::from_secs(1)), 0);
        assert_eq!(ticker.time_until_next(), None);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut ticker = IntervalTicker::new();
        ticker.start(Duration::ZERO);
        assert_eq!(ticker.interval, Duration::from_millis(1));
    }

    #[test]
    fn test_manual_ticker_ignores_fire_while_stopped() {
        let mut ticker = ManualTicker::new();
        ticker.fire(3);
        assert_eq!(ticker.due_ticks(), 0);

        ticker.start(Duration::from_millis(100));
        ticker.fire(2);
        ticker.fire(1);
        assert_eq!(ticker.due_ticks(), 3);
        assert_eq!(ticker.due_ticks(), 0);

        ticker.fire(5);
        ticker.stop();
        assert_eq!(ticker.due_ticks(), 0);
        assert_eq!(ticker.interval(), None);
    }
}
