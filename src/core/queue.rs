//! Priority queue for pending announcements.
//!
//! Entries are kept in ascending `(priority, enqueued_at)` order via sorted
//! insert, so the entry with the smallest key is always at the front.
//! Entries are never mutated in place; purges only remove.

use std::time::{Duration, Instant};

use crate::accessible::AccessibleRef;
use crate::domain::{Message, PolitenessLevel};

/// One pending announcement.
#[derive(Clone)]
pub struct QueueEntry {
    /// Priority band this entry was enqueued under.
    pub priority: PolitenessLevel,

    /// When the entry was enqueued. Part of the ordering key, so entries
    /// within a priority band stay in arrival order.
    pub enqueued_at: Instant,

    /// The extracted announcement.
    pub message: Message,

    /// The live region the announcement came from (borrowed).
    pub source: AccessibleRef,
}

impl QueueEntry {
    fn key(&self) -> (PolitenessLevel, Instant) {
        (self.priority, self.enqueued_at)
    }
}

/// Ordered sequence of pending announcements.
#[derive(Default)]
pub struct PriorityQueue {
    entries: Vec<QueueEntry>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert maintaining sort order by `(priority, enqueued_at)`.
    pub fn enqueue(&mut self, message: Message, priority: PolitenessLevel, source: AccessibleRef) {
        self.enqueue_at(message, priority, source, Instant::now());
    }

    /// Insert with an explicit timestamp. Replay and tests use this to
    /// control ordering precisely.
    pub fn enqueue_at(
        &mut self,
        message: Message,
        priority: PolitenessLevel,
        source: AccessibleRef,
        enqueued_at: Instant,
    ) {
        let entry = QueueEntry {
            priority,
            enqueued_at,
            message,
            source,
        };
        let position = self.entries.partition_point(|e| e.key() < entry.key());
        self.entries.insert(position, entry);
    }

    /// Remove and return the entry with the smallest `(priority, enqueued_at)`
    /// key, or `None` when the queue is empty.
    pub fn dequeue(&mut self) -> Option<QueueEntry> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0))
    }

    /// Drop entries older than `max_age`, so stale announcements (for
    /// example from a page the user already left) are never spoken.
    pub fn purge_by_keep_alive(&mut self, max_age: Duration) {
        self.purge_older_than(Instant::now(), max_age);
    }

    /// Age-based purge against an explicit "now", for deterministic tests.
    pub fn purge_older_than(&mut self, now: Instant, max_age: Duration) {
        self.entries
            .retain(|entry| now.saturating_duration_since(entry.enqueued_at) <= max_age);
    }

    /// Drop every entry with `priority <= threshold`. Survivors keep their
    /// relative order. This is how an assertive event evicts queued polite
    /// entries, and a rude event evicts assertive (and polite) ones.
    pub fn purge_by_priority(&mut self, threshold: PolitenessLevel) {
        self.entries.retain(|entry| entry.priority > threshold);
    }

    /// Empty the queue unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Priorities in queue order, cheapest way for callers to inspect state.
    pub fn priorities(&self) -> Vec<PolitenessLevel> {
        self.entries.iter().map(|entry| entry.priority).collect()
    }
}
