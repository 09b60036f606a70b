//! One-shot timers for the scheduler's polling loop.
//!
//! The transport never sleeps or spawns threads. It asks a [`TimerHost`] to
//! call back after a delay, and whoever owns the event loop hands fired
//! handles to `Transport::fire`. Cancelling is immediate: a cancelled handle
//! is never returned by the host again.

use std::time::Duration;

/// Identifies one armed timer. Hosts mint them; ids must not repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait TimerHost {
    fn arm(&mut self, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Deadlines measured against a clock the caller advances.
///
/// Feed it wall time (`Instant::elapsed`) from a UI loop, or virtual time
/// from an offline render. Delays are relative to the last `advance_to`.
#[derive(Debug, Default)]
pub struct DeadlineTimers {
    now: Duration,
    next_id: u64,
    pending: Vec<(TimerHandle, Duration)>,
}

impl DeadlineTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|(_, deadline)| *deadline).min()
    }

    /// Move the clock to `elapsed` and return every timer now due, earliest
    /// first. The clock never moves backwards.
    pub fn advance_to(&mut self, elapsed: Duration) -> Vec<TimerHandle> {
        self.now = self.now.max(elapsed);

        let now = self.now;
        let mut due: Vec<(TimerHandle, Duration)> = self
            .pending
            .iter()
            .copied()
            .filter(|(_, deadline)| *deadline <= now)
            .collect();
        self.pending.retain(|(_, deadline)| *deadline > now);

        due.sort_by_key(|(handle, deadline)| (*deadline, handle.0));
        due.into_iter().map(|(handle, _)| handle).collect()
    }
}

impl TimerHost for DeadlineTimers {
    fn arm(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        self.pending.push((handle, self.now + delay));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(pending, _)| *pending != handle);
    }
}
