// ── Activity log ──
//
// Operator-visible ring of the most recent events, newest first.

use std::collections::VecDeque;

use crate::model::{LogEntry, Severity};

/// Number of entries kept before the oldest is evicted.
pub const LOG_CAPACITY: usize = 20;

/// Bounded, append-only log. Entries are never mutated once written.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl ActivityLog {
    /// A log holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, evicting from the tail past capacity.
    pub fn append(&mut self, message: impl Into<String>, severity: Severity) -> &LogEntry {
        self.entries.push_front(LogEntry::new(message, severity));
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
