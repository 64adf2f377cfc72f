//! Injected-clock timers
//!
//! Neither timer owns a thread or sleeps. The caller passes `now` in and
//! asks whether the timer is due, so a UI loop and a test drive them the
//! same way.

use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Debouncer
// ─────────────────────────────────────────────────────────────────────────────

/// One-shot timer that every `arm` pushes back.
///
/// Only the last deadline can fire; earlier ones are replaced.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A pending deadline keeps its original time.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// (Re)start the countdown from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True exactly once, on the first call at or after the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Interval Timer
// ─────────────────────────────────────────────────────────────────────────────

/// Recurring timer; stopped until `start` is called.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Change the interval; a running timer restarts from `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.is_running() {
            self.start(now);
        }
    }

    /// True when a period has elapsed; the next period starts from `now`.
    ///
    /// Missed periods are not replayed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_debouncer_fires_once_after_delay() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(300 * MS);
        debounce.arm(t0);

        assert!(!debounce.fire_if_due(t0 + 299 * MS));
        assert!(debounce.fire_if_due(t0 + 300 * MS));
        assert!(!debounce.fire_if_due(t0 + 1000 * MS));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_rearm_supersedes_deadline() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(300 * MS);
        debounce.arm(t0);
        debounce.arm(t0 + 200 * MS);

        assert!(!debounce.fire_if_due(t0 + 300 * MS));
        assert!(debounce.fire_if_due(t0 + 500 * MS));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(10 * MS);
        debounce.arm(t0);
        debounce.cancel();
        assert!(!debounce.fire_if_due(t0 + 20 * MS));
    }

    #[test]
    fn test_interval_timer_recurs() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(60_000 * MS);
        assert!(!timer.fire_if_due(t0 + 120_000 * MS));

        timer.start(t0);
        assert!(!timer.fire_if_due(t0 + 59_999 * MS));
        assert!(timer.fire_if_due(t0 + 60_000 * MS));
        assert!(!timer.fire_if_due(t0 + 60_001 * MS));
        assert!(timer.fire_if_due(t0 + 120_000 * MS));
    }

    #[test]
    fn test_interval_timer_skips_missed_periods() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(10 * MS);
        timer.start(t0);
        assert!(timer.fire_if_due(t0 + 100 * MS));
        assert!(!timer.fire_if_due(t0 + 105 * MS));
    }

    #[test]
    fn test_set_interval_restarts_running_timer() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(10 * MS);
        timer.start(t0);
        timer.set_interval(50 * MS, t0 + 5 * MS);
        assert!(!timer.fire_if_due(t0 + 20 * MS));
        assert!(timer.fire_if_due(t0 + 55 * MS));
    }
}
