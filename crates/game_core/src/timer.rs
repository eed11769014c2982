//! Virtual-time queue of cancellable one-shot timers.
//!
//! The queue never sleeps. Its owner advances it by elapsed time and pops whatever came
//! due, in deadline order with ties resolved by scheduling order.

use std::{collections::BTreeMap, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), K>,
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay, id), kind);
        id
    }

    /// Removes a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self
            .pending
            .keys()
            .find(|(_, pending_id)| *pending_id == id)
            .copied();

        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.keys().any(|(_, pending_id)| *pending_id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// How long until the earliest pending timer is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now))
    }

    /// Pops the earliest timer due at or before `horizon`, moving the clock to its deadline.
    pub fn pop_due(&mut self, horizon: Duration) -> Option<(TimerId, K)> {
        let (deadline, id) = *self.pending.keys().next()?;
        if deadline > horizon {
            return None;
        }

        let kind = self.pending.remove(&(deadline, id))?;
        self.now = self.now.max(deadline);
        Some((id, kind))
    }

    /// Moves the clock forward without firing anything. Never moves it backwards.
    pub fn advance_to(&mut self, horizon: Duration) {
        self.now = self.now.max(horizon);
    }
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
