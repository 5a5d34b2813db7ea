//! Fire-once-then-reschedule tick timer.
//!
//! Each firing schedules the next deadline one interval after the moment it
//! fired, so a late callback pushes every later tick back instead of bursting
//! to catch up.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    deadline: Instant,
    fired: u64,
}

impl TickTimer {
    /// Timer whose first deadline is `start` (fires immediately).
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            deadline: start,
            fired: 0,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next deadline.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Number of times the timer has fired.
    #[inline]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Time left until the deadline, zero when due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Fire if due at `now`, rescheduling for `now + interval`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.deadline = now + self.interval;
        self.fired += 1;
        true
    }

    /// Block until the deadline, then fire.
    pub fn wait(&mut self) {
        let remaining = self.remaining(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        // The deadline has passed, so this always fires
        let fired = self.poll(Instant::now());
        debug_assert!(fired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(16);

    #[test]
    fn test_fires_immediately() {
        let start = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, start);
        assert!(timer.poll(start));
        assert_eq!(timer.fired(), 1);
        assert_eq!(timer.deadline(), start + INTERVAL);
    }

    #[test]
    fn test_not_due_before_deadline() {
        let start = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, start);
        timer.poll(start);
        assert!(!timer.poll(start + Duration::from_millis(15)));
        assert_eq!(timer.fired(), 1);
        assert_eq!(timer.remaining(start + Duration::from_millis(10)), Duration::from_millis(6));
    }

    #[test]
    fn test_late_fire_reschedules_from_fire_time() {
        let start = Instant::now();
        let mut timer = TickTimer::new(INTERVAL, start);
        timer.poll(start);

        // 34ms late: only one tick, next deadline measured from now
        let late = start + Duration::from_millis(50);
        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.deadline(), late + INTERVAL);
        assert_eq!(timer.fired(), 2);
    }

    #[test]
    fn test_wait_blocks_for_interval() {
        let mut timer = TickTimer::new(Duration::from_millis(5), Instant::now());
        timer.wait();
        let before = Instant::now();
        timer.wait();
        assert!(before.elapsed() >= Duration::from_millis(4));
        assert_eq!(timer.fired(), 2);
    }
}
