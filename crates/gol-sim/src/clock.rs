//! Time sources and periodic timer scheduling.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Identifies one scheduled periodic timer. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// One due firing of a periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub handle: TimerHandle,
    /// Deadline that came due, relative to the clock's origin
    pub at: Duration,
}

/// Time and periodic-callback facility used by the simulator.
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Start a periodic timer; the first firing is one `period` from now
    fn schedule(&mut self, period: Duration) -> TimerHandle;

    /// Stop a timer. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Collect the timers due at `now()`, in deadline order. A timer fires
    /// at most once per poll; missed periods are not replayed. A zero-period
    /// timer fires on every poll.
    fn poll_due(&mut self) -> Vec<Firing>;

    /// Earliest pending deadline, if any timer is active
    fn next_deadline(&self) -> Option<Duration>;
}

#[derive(Debug, Clone)]
struct Timer {
    period: Duration,
    deadline: Duration,
}

/// Bookkeeping of active periodic timers, shared by the clock implementations
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: BTreeMap<TimerHandle, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Duration, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            handle,
            Timer {
                period,
                deadline: now + period,
            },
        );
        handle
    }

    /// Returns whether the handle was active
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }

    /// Each due timer fires once, however many periods were missed, and
    /// its next deadline is one period after `now`.
    pub fn due(&mut self, now: Duration) -> Vec<Firing> {
        let mut fired = Vec::new();

        for (&handle, timer) in self.timers.iter_mut() {
            if timer.deadline <= now {
                fired.push(Firing {
                    handle,
                    at: timer.deadline,
                });
                timer.deadline = now + timer.period;
            }
        }

        fired.sort_by_key(|f| (f.at, f.handle));
        fired
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|t| t.deadline).min()
    }
}

/// Clock whose time only moves when told to. Firings are delivered
/// synchronously on the next poll, which makes timing fully deterministic.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    timers: TimerQueue,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.is_active(handle)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, period: Duration) -> TimerHandle {
        self.timers.schedule(self.now, period)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }

    fn poll_due(&mut self) -> Vec<Firing> {
        self.timers.due(self.now)
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }
}

/// Wall-clock time measured from construction
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    timers: TimerQueue,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: TimerQueue::new(),
        }
    }

    /// How long until the next timer is due (zero if already due)
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now()))
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule(&mut self, period: Duration) -> TimerHandle {
        let now = self.now();
        self.timers.schedule(now, period)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }

    fn poll_due(&mut self) -> Vec<Firing> {
        let now = self.now();
        self.timers.due(now)
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }
}
