//! Fixed-cadence tick clock.
//!
//! [`TickClock::wait`] is called once at the end of every tick and sleeps
//! until the next tick is due.  When a tick's work overran its budget the
//! clock does not try to catch up; the schedule restarts from now, so a slow
//! detector lowers the effective rate instead of bunching ticks together.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug)]
pub struct TickClock {
    /// `None` runs unpaced (headless replays, tests).
    period:   Option<Duration>,
    next:     Instant,
    ticks:    u64,
    overruns: u64,
}

impl TickClock {
    pub fn new(ticks_per_second: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / ticks_per_second.max(1) as f64);
        TickClock {
            period:   Some(period),
            next:     Instant::now() + period,
            ticks:    0,
            overruns: 0,
        }
    }

    pub fn unpaced() -> Self {
        TickClock { period: None, next: Instant::now(), ticks: 0, overruns: 0 }
    }

    pub fn period(&self) -> Option<Duration> { self.period }

    /// Block until the next tick is due.
    pub fn wait(&mut self) {
        self.ticks += 1;
        let period = match self.period {
            Some(p) => p,
            None    => return,
        };
        let now = Instant::now();
        if now < self.next {
            thread::sleep(self.next - now);
            self.next += period;
        } else {
            self.overruns += 1;
            debug!(
                tick = self.ticks,
                late_ms = (now - self.next).as_secs_f64() * 1000.0,
                "tick overran its budget"
            );
            self.next = now + period;
        }
    }

    pub fn ticks(&self)    -> u64 { self.ticks }
    pub fn overruns(&self) -> u64 { self.overruns }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_from_rate() {
        let c = TickClock::new(30);
        let p = c.period().unwrap();
        assert!(p > Duration::from_millis(33) && p < Duration::from_millis(34));
    }

    #[test]
    fn holds_cadence() {
        let mut c = TickClock::new(100);
        let start = Instant::now();
        for _ in 0..5 { c.wait(); }
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(c.ticks(), 5);
    }

    #[test]
    fn slow_tick_counts_as_overrun() {
        let mut c = TickClock::new(1000);
        thread::sleep(Duration::from_millis(5));
        c.wait();
        assert_eq!(c.overruns(), 1);
    }

    #[test]
    fn unpaced_never_sleeps_or_overruns() {
        let mut c = TickClock::unpaced();
        let start = Instant::now();
        for _ in 0..1000 { c.wait(); }
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(c.overruns(), 0);
        assert_eq!(c.ticks(), 1000);
    }
}
