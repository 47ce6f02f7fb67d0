//! Bounded cache of recently spoken announcements.
//!
//! Holds the last few spoken utterance sets so the user can review them on
//! demand. Strictly FIFO: review never reorders or reprioritizes anything.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Default capacity: one slot per review key binding.
pub const DEFAULT_CACHE_SIZE: usize = 9;

/// A previously spoken announcement.
#[derive(Debug, Clone)]
pub struct CachedMessage {
    /// The utterances exactly as spoken.
    pub utterances: Vec<String>,

    /// Wall-clock time the announcement was spoken.
    pub spoken_at: DateTime<Utc>,
}

/// FIFO cache of spoken messages, oldest evicted first.
pub struct MessageCache {
    capacity: usize,
    entries: VecDeque<CachedMessage>,
}

impl MessageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a spoken announcement, evicting the oldest beyond capacity.
    pub fn push(&mut self, utterances: Vec<String>) {
        self.entries.push_back(CachedMessage {
            utterances,
            spoken_at: Utc::now(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Review the nth most recent announcement, 1-indexed (`review(1)` is
    /// the newest). `None` when fewer messages have been spoken.
    pub fn review(&self, n: usize) -> Option<&CachedMessage> {
        if n == 0 || n > self.entries.len() {
            return None;
        }
        self.entries.get(self.entries.len() - n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MessageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}
