use chrono::{Local, NaiveDate};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Shortest interval a schedule accepts; anything below is clamped up.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Source of recurring ticks and of the current calendar date.
pub trait Clock {
    type Schedule: TickSchedule;

    /// Start a schedule that comes due every `interval`.
    /// The schedule stays alive exactly as long as the returned handle.
    fn schedule_recurring(&self, interval: Duration) -> Self::Schedule;

    fn today(&self) -> NaiveDate;
}

/// Owned handle to a recurring schedule. Dropping the handle cancels it.
pub trait TickSchedule {
    /// Number of intervals that came due since the previous call
    /// (or since the schedule was created).
    fn take_due(&mut self) -> u32;

    /// Cancel the schedule. Ticks that came due but were not taken are discarded.
    fn cancel(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

fn drain_due<T>(next_due: &mut T, now: T, interval: Duration) -> u32
where
    T: PartialOrd + Copy + std::ops::AddAssign<Duration>,
{
    let mut due = 0;
    while now >= *next_due {
        due += 1;
        *next_due += interval;
    }
    due
}

/// Wall clock backed by `Instant` and the local calendar
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[derive(Debug)]
pub struct SystemSchedule {
    interval: Duration,
    next_due: Instant,
}

impl Clock for SystemClock {
    type Schedule = SystemSchedule;

    fn schedule_recurring(&self, interval: Duration) -> SystemSchedule {
        let interval = interval.max(MIN_INTERVAL);
        SystemSchedule {
            interval,
            next_due: Instant::now() + interval,
        }
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

impl TickSchedule for SystemSchedule {
    fn take_due(&mut self) -> u32 {
        drain_due(&mut self.next_due, Instant::now(), self.interval)
    }
}

#[derive(Debug)]
struct FakeClockState {
    now: Duration,
    today: NaiveDate,
    next_schedule: u64,
    live: HashSet<u64>,
}

/// Manually driven clock for tests and headless runs.
///
/// Clones share the same timeline, so a test can keep one handle to advance
/// time while the session under test owns another.
#[derive(Debug, Clone)]
pub struct FakeClock {
    state: Rc<RefCell<FakeClockState>>,
}

impl FakeClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeClockState {
                now: Duration::ZERO,
                today,
                next_schedule: 0,
                live: HashSet::new(),
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.state.borrow_mut().now += by;
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.state.borrow_mut().today = today;
    }

    /// Number of schedules whose handles are still alive
    pub fn active_schedules(&self) -> usize {
        self.state.borrow().live.len()
    }
}

#[derive(Debug)]
pub struct FakeSchedule {
    id: u64,
    interval: Duration,
    next_due: Duration,
    state: Rc<RefCell<FakeClockState>>,
}

impl Clock for FakeClock {
    type Schedule = FakeSchedule;

    fn schedule_recurring(&self, interval: Duration) -> FakeSchedule {
        let interval = interval.max(MIN_INTERVAL);
        let mut state = self.state.borrow_mut();
        let id = state.next_schedule;
        state.next_schedule += 1;
        state.live.insert(id);

        FakeSchedule {
            id,
            interval,
            next_due: state.now + interval,
            state: Rc::clone(&self.state),
        }
    }

    fn today(&self) -> NaiveDate {
        self.state.borrow().today
    }
}

impl TickSchedule for FakeSchedule {
    fn take_due(&mut self) -> u32 {
        let now = self.state.borrow().now;
        drain_due(&mut self.next_due, now, self.interval)
    }
}

impl Drop for FakeSchedule {
    fn drop(&mut self) {
        self.state.borrow_mut().live.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn fake_schedule_counts_whole_intervals() {
        let clock = FakeClock::new(day());
        let mut schedule = clock.schedule_recurring(Duration::from_secs(1));

        clock.advance(Duration::from_millis(999));
        assert_eq!(schedule.take_due(), 0);

        clock.advance(Duration::from_millis(1));
        assert_eq!(schedule.take_due(), 1);

        clock.advance_secs(5);
        assert_eq!(schedule.take_due(), 5);
        assert_eq!(schedule.take_due(), 0);
    }

    #[test]
    fn dropping_a_schedule_unregisters_it() {
        let clock = FakeClock::new(day());
        let first = clock.schedule_recurring(Duration::from_secs(1));
        let second = clock.schedule_recurring(Duration::from_secs(1));
        assert_eq!(clock.active_schedules(), 2);

        drop(first);
        assert_eq!(clock.active_schedules(), 1);

        second.cancel();
        assert_eq!(clock.active_schedules(), 0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let clock = FakeClock::new(day());
        let mut schedule = clock.schedule_recurring(Duration::ZERO);
        clock.advance(Duration::from_millis(3));
        assert_eq!(schedule.take_due(), 3);
    }

    #[test]
    fn fake_clock_reports_configured_day() {
        let clock = FakeClock::new(day());
        assert_eq!(clock.today(), day());

        let next = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        clock.set_today(next);
        assert_eq!(clock.today(), next);
    }

    #[test]
    fn system_schedule_is_not_due_immediately() {
        let mut schedule = SystemClock.schedule_recurring(Duration::from_secs(60));
        assert_eq!(schedule.take_due(), 0);
    }
}
