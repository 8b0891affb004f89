use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Moves the clock forward to `instant`; never moves it backwards.
    pub fn advance_to(&self, instant: Instant) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if instant > *now {
            *now = instant;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct ScheduledTimer<E> {
    handle: TimerHandle,
    deadline: Instant,
    event: E,
}

/// Pending timers for one state machine. Nothing fires on its own: the owner
/// asks for due events with [`Scheduler::pop_due`] from its single execution
/// context.
pub struct Scheduler<E> {
    next_id: u64,
    pending: Vec<ScheduledTimer<E>>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledTimer {
            handle,
            deadline: now + delay,
            event,
        });
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn deadline(&self, handle: TimerHandle) -> Option<Instant> {
        self.pending
            .iter()
            .find(|timer| timer.handle == handle)
            .map(|timer| timer.deadline)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|timer| timer.deadline).min()
    }

    /// Removes and returns the earliest timer whose deadline has passed.
    /// Timers sharing a deadline come out in scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, E)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| (timer.deadline, timer.handle.0))
            .map(|(index, _)| index)?;

        let timer = self.pending.remove(index);
        Some((timer.handle, timer.event))
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_before_deadline() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(clock.now(), Duration::from_millis(500), "tick");

        clock.advance(Duration::from_millis(499));

        assert!(scheduler.pop_due(clock.now()).is_none());
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_due_timers_pop_in_deadline_order() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(clock.now(), Duration::from_millis(300), "late");
        scheduler.schedule(clock.now(), Duration::from_millis(100), "early");

        clock.advance(Duration::from_secs(1));

        assert_eq!(scheduler.pop_due(clock.now()).map(|(_, e)| e), Some("early"));
        assert_eq!(scheduler.pop_due(clock.now()).map(|(_, e)| e), Some("late"));
        assert!(scheduler.pop_due(clock.now()).is_none());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(clock.now(), Duration::from_millis(10), 1);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));

        clock.advance(Duration::from_secs(1));
        assert!(scheduler.pop_due(clock.now()).is_none());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_handles_are_unique() {
        let clock = ManualClock::new();
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(clock.now(), Duration::ZERO, ());
        scheduler.cancel_all();
        let second = scheduler.schedule(clock.now(), Duration::ZERO, ());

        assert_ne!(first, second);
        assert_eq!(scheduler.deadline(first), None);
        assert_eq!(scheduler.deadline(second), Some(clock.now()));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();

        other.advance(Duration::from_secs(2));

        assert_eq!(clock.now() - start, Duration::from_secs(2));

        clock.advance_to(start);
        assert_eq!(clock.now() - start, Duration::from_secs(2));
    }
}
