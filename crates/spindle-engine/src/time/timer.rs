use std::time::{Duration, Instant};

/// Repeating deadline timer.
///
/// The timer does not sleep or spawn anything; it only answers "is a tick due
/// at `now`?". A timer that falls behind (debugger pause, minimized window)
/// fires once and reschedules one period after `now`, so callers never see a
/// burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    next_due: Option<Instant>,
    fired: u64,
}

impl Timer {
    /// Creates a stopped timer with the given period.
    ///
    /// A zero period is bumped to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
            fired: 0,
        }
    }

    /// Creates a timer and starts it at `now`.
    pub fn started(period: Duration, now: Instant) -> Self {
        let mut timer = Self::new(period);
        timer.start(now);
        timer
    }

    /// Starts (or restarts) the timer; the first tick is due one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Instant of the next tick, or `None` when stopped.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Number of ticks fired since construction.
    #[inline]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Returns `true` if a tick is due at `now`, and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        self.fired = self.fired.wrapping_add(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(20);

    #[test]
    fn stopped_timer_never_fires() {
        let mut t = Timer::new(PERIOD);
        assert!(!t.is_running());
        assert_eq!(t.deadline(), None);
        assert!(!t.poll(Instant::now() + Duration::from_secs(10)));
    }

    #[test]
    fn fires_only_when_due() {
        let t0 = Instant::now();
        let mut t = Timer::started(PERIOD, t0);

        assert!(!t.poll(t0));
        assert!(!t.poll(t0 + Duration::from_millis(19)));
        assert!(t.poll(t0 + PERIOD));
        assert_eq!(t.fired(), 1);
    }

    #[test]
    fn one_tick_per_deadline() {
        let t0 = Instant::now();
        let mut t = Timer::started(PERIOD, t0);

        assert!(t.poll(t0 + PERIOD));
        assert!(!t.poll(t0 + PERIOD));
        assert_eq!(t.deadline(), Some(t0 + PERIOD * 2));
    }

    #[test]
    fn late_poll_does_not_burst() {
        let t0 = Instant::now();
        let mut t = Timer::started(PERIOD, t0);

        let late = t0 + Duration::from_millis(500);
        assert!(t.poll(late));
        assert!(!t.poll(late));
        assert_eq!(t.deadline(), Some(late + PERIOD));
    }

    #[test]
    fn stop_clears_deadline() {
        let t0 = Instant::now();
        let mut t = Timer::started(PERIOD, t0);
        t.stop();
        assert!(!t.poll(t0 + PERIOD));
    }

    #[test]
    fn zero_period_is_clamped() {
        let t = Timer::new(Duration::ZERO);
        assert_eq!(t.period(), Duration::from_millis(1));
    }
}
