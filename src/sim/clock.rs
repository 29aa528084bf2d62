//! Virtual-time timer service
//!
//! Single-threaded scheduler for interval and one-shot callbacks. Nothing runs
//! on its own: the owner pumps [`Scheduler::pop_due`] and dispatches each event,
//! so callbacks never overlap and a timer cancelled by an earlier callback in
//! the same batch never fires.

use serde::{Deserialize, Serialize};

/// Cancellation handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due_ms: u64,
    /// `Some` for repeating timers
    period_ms: Option<u64>,
    event: E,
}

/// Scheduler over an event payload `E`
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            timers: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire `event` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.insert(delay_ms, None, event)
    }

    /// Fire `event` every `period_ms`, first firing one period from now.
    ///
    /// A zero period is bumped to 1 ms so the timer can never starve the loop.
    pub fn schedule_interval(&mut self, period_ms: u64, event: E) -> TimerId {
        let period_ms = period_ms.max(1);
        self.insert(period_ms, Some(period_ms), event)
    }

    fn insert(&mut self, delay_ms: u64, period_ms: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            event,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward without firing anything.
    ///
    /// Callers drain [`Self::pop_due`] first; time never moves backwards.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

impl<E: Clone> Scheduler<E> {
    /// Take the earliest timer due at or before `until_ms`.
    ///
    /// The clock jumps to that timer's deadline. Interval timers are re-armed
    /// one period later; one-shot timers are removed. Equal deadlines fire in
    /// scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, E)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let due_ms = self.timers[index].due_ms;
        self.now_ms = self.now_ms.max(due_ms);

        match self.timers[index].period_ms {
            Some(period) => {
                let timer = &mut self.timers[index];
                timer.due_ms += period;
                Some((timer.id, timer.event.clone()))
            }
            None => {
                let timer = self.timers.swap_remove(index);
                Some((timer.id, timer.event))
            }
        }
    }
}
