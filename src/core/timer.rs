//! # Timer Queue
//!
//! Every delayed effect in the session (typewriter pacing, the fallback
//! re-enable, the focus settle delay, copy feedback) is a [`Timer`] entry in
//! a plain data queue owned by `App`. Nothing here sleeps: `update()` pops
//! due entries when it receives `Action::Tick(now)`.
//!
//! ```text
//! schedule(deadline, timer)          Tick(now)
//!          │                             │
//!          ▼                             ▼
//!   [(3ms, #4) (3ms, #5) (1s, #2)]  ─► pop_due(now) → fire in deadline order
//! ```
//!
//! Entries with equal deadlines fire in insertion order, which is what a
//! chain of `setTimeout(.., 0)` calls would do.

use std::time::Duration;

use crate::core::message::MessageId;

/// Things that can happen later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Emit the next unit of a progressive render.
    TypewriterStep(MessageId),
    /// Error path: release the session a fixed delay after the fallback was appended.
    ReleaseAfterFallback(MessageId),
    /// Give the composer focus once the open transition has settled.
    FocusComposer,
    /// Revert a message's "copied" confirmation.
    ResetCopyFeedback(MessageId),
}

#[derive(Debug)]
struct Scheduled {
    deadline: Duration,
    seq: u64,
    timer: Timer,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Sorted by (deadline, seq).
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Duration, timer: Timer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self
            .entries
            .partition_point(|e| (e.deadline, e.seq) <= (deadline, seq));
        self.entries.insert(
            at,
            Scheduled {
                deadline,
                seq,
                timer,
            },
        );
    }

    /// Removes and returns the earliest timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, Timer)> {
        if self.entries.first()?.deadline > now {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.deadline, entry.timer))
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Drops every pending timer matching `predicate`. Returns how many were dropped.
    pub fn cancel_where(&mut self, predicate: impl Fn(&Timer) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !predicate(&e.timer));
        before - self.entries.len()
    }

    pub fn contains(&self, timer: &Timer) -> bool {
        self.entries.iter().any(|e| &e.timer == timer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
