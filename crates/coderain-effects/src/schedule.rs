//! Tick scheduling.
//!
//! Engines never sleep or spawn threads. They ask a [`Scheduler`] for timers
//! and the host event loop polls a [`TimerQueue`] for the ids that are due,
//! handing each one back to the engine that owns it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifier of a scheduled timer. Never reused within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Timer capability handed to the engines.
pub trait Scheduler {
    /// Fire every `period`, starting one period from now.
    fn schedule_periodic(&self, period: Duration) -> TimerId;

    /// Fire once after `delay`.
    fn schedule_once(&self, delay: Duration) -> TimerId;

    /// Cancel a timer. Unknown or already finished ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// What an engine did with a fired timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The id is not a timer the engine currently owns.
    Ignored,
    /// One tick was rendered.
    Advanced,
    /// The tick finished the effect and stopped it.
    Completed,
    /// A pending repeat fired and the effect started again.
    Restarted,
}

/// A live timer that is cancelled when dropped.
pub struct TimerGuard {
    id: TimerId,
    scheduler: Rc<dyn Scheduler>,
}

impl TimerGuard {
    /// Acquire a periodic timer.
    pub fn periodic(scheduler: &Rc<dyn Scheduler>, period: Duration) -> Self {
        Self {
            id: scheduler.schedule_periodic(period),
            scheduler: Rc::clone(scheduler),
        }
    }

    /// Acquire a one-shot timer.
    pub fn once(scheduler: &Rc<dyn Scheduler>, delay: Duration) -> Self {
        Self {
            id: scheduler.schedule_once(delay),
            scheduler: Rc::clone(scheduler),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.scheduler.cancel(self.id);
    }
}

impl fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerGuard").field("id", &self.id).finish()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    due: Instant,
    period: Option<Duration>,
}

#[derive(Debug)]
struct Queue {
    now: Instant,
    next_id: u64,
    entries: Vec<Entry>,
}

/// Single-threaded timer queue polled by the host loop.
///
/// The queue keeps its own notion of "now", advanced only by [`poll`], so
/// tests can drive it with synthetic instants.
///
/// [`poll`]: TimerQueue::poll
#[derive(Debug)]
pub struct TimerQueue {
    inner: RefCell<Queue>,
}

impl TimerQueue {
    /// Create a queue whose clock starts at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            inner: RefCell::new(Queue {
                now,
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Advance the clock to `now` and return the timers that are due, in
    /// deadline order.
    ///
    /// A periodic timer fires at most once per poll; periods missed while
    /// the host was busy are skipped rather than replayed in a burst.
    pub fn poll(&self, now: Instant) -> Vec<TimerId> {
        let mut queue = self.inner.borrow_mut();
        if now > queue.now {
            queue.now = now;
        }
        let now = queue.now;

        let mut due: Vec<(Instant, TimerId)> = Vec::new();
        queue.entries.retain_mut(|entry| {
            if entry.due > now {
                return true;
            }
            due.push((entry.due, entry.id));
            match entry.period {
                Some(period) => {
                    let next = entry.due + period;
                    entry.due = if next > now { next } else { now + period };
                    true
                }
                None => false,
            }
        });

        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Earliest deadline among the live timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.borrow().entries.iter().map(|e| e.due).min()
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` is still scheduled.
    pub fn contains(&self, id: TimerId) -> bool {
        self.inner.borrow().entries.iter().any(|e| e.id == id)
    }

    fn insert(&self, delay: Duration, period: Option<Duration>) -> TimerId {
        let mut queue = self.inner.borrow_mut();
        let id = TimerId(queue.next_id);
        queue.next_id += 1;
        let due = queue.now + delay;
        queue.entries.push(Entry { id, due, period });
        id
    }
}

impl Scheduler for TimerQueue {
    fn schedule_periodic(&self, period: Duration) -> TimerId {
        self.insert(period, Some(period))
    }

    fn schedule_once(&self, delay: Duration) -> TimerId {
        self.insert(delay, None)
    }

    fn cancel(&self, id: TimerId) {
        self.inner.borrow_mut().entries.retain(|e| e.id != id);
    }
}
