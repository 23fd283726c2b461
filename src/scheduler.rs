//! Tick scheduler
//!
//! Converts elapsed time into discrete [`Tick`] events: a clock tick every
//! [`CLOCK_INTERVAL`] and a data tick every [`DATA_INTERVAL`]. Time is passed
//! in, so the controller can be driven without waiting on a real clock.
//! A deadline that was missed several times fires once, then realigns to the
//! next multiple of its period.

use std::time::{Duration, Instant};

use crate::config::{CLOCK_INTERVAL, DATA_INTERVAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Refresh the displayed time
    Clock,
    /// Generate readings and apply control
    Data,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    next_clock: Instant,
    next_data: Instant,
}

impl Scheduler {
    /// First ticks fire one period after `start`
    pub fn new(start: Instant) -> Self {
        Self {
            next_clock: start + CLOCK_INTERVAL,
            next_data: start + DATA_INTERVAL,
        }
    }

    /// Ticks due at `now`, clock before data
    pub fn poll(&mut self, now: Instant) -> Vec<Tick> {
        let mut due = Vec::with_capacity(2);
        if now >= self.next_clock {
            due.push(Tick::Clock);
            self.next_clock = realign(self.next_clock, CLOCK_INTERVAL, now);
        }
        if now >= self.next_data {
            due.push(Tick::Data);
            self.next_data = realign(self.next_data, DATA_INTERVAL, now);
        }
        due
    }

    /// Time left until the next tick of either kind
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_clock
            .min(self.next_data)
            .saturating_duration_since(now)
    }
}

fn realign(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let mut next = deadline + period;
    while next <= now {
        next += period;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_nothing_due_before_first_period() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(start);
        assert!(scheduler.poll(start).is_empty());
        assert!(scheduler.poll(start + ms(999)).is_empty());
        assert_eq!(scheduler.until_next(start), ms(1000));
    }

    #[test]
    fn test_cadence_over_nine_seconds() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(start);
        let mut clock = 0;
        let mut data = 0;

        // Poll every 100 ms
        for step in 1..=90 {
            for tick in scheduler.poll(start + ms(step * 100)) {
                match tick {
                    Tick::Clock => clock += 1,
                    Tick::Data => data += 1,
                }
            }
        }

        assert_eq!(clock, 9);
        assert_eq!(data, 3);
    }

    #[test]
    fn test_clock_fires_before_data() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(start);
        scheduler.poll(start + ms(1000));
        scheduler.poll(start + ms(2000));
        assert_eq!(scheduler.poll(start + ms(3000)), vec![Tick::Clock, Tick::Data]);
    }

    #[test]
    fn test_missed_ticks_collapse() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(start);

        // Ten seconds without polling
        let late = start + ms(10_000);
        assert_eq!(scheduler.poll(late), vec![Tick::Clock, Tick::Data]);
        assert!(scheduler.poll(late).is_empty());

        // Realigned to the period grid: clock at 11 s, data at 12 s
        assert_eq!(scheduler.until_next(late), ms(1000));
        assert_eq!(scheduler.poll(start + ms(11_000)), vec![Tick::Clock]);
        assert_eq!(scheduler.poll(start + ms(12_000)), vec![Tick::Clock, Tick::Data]);
    }

    #[test]
    fn test_until_next_saturates() {
        let start = Instant::now();
        let scheduler = Scheduler::new(start);
        assert_eq!(scheduler.until_next(start + ms(5000)), Duration::ZERO);
    }
}
