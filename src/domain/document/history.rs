// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/history.rs
//
// Snapshot history with an undo floor of one entry.

use std::collections::VecDeque;

/// Chronological stack of snapshots.
///
/// The first entry is the decoded source; it can never be undone. Every
/// commit stores a full copy. An optional limit turns the stack into a ring
/// buffer that forgets the oldest entries (the current top is always kept).
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    entries: VecDeque<T>,
    limit: Option<usize>,
}

impl<T> HistoryStack<T> {
    /// Start a history with its initial snapshot.
    pub fn new(initial: T) -> Self {
        Self::with_limit(initial, None)
    }

    /// Start a history that keeps at most `limit` entries.
    pub fn with_limit(initial: T, limit: Option<usize>) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(initial);
        Self {
            entries,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Push a new snapshot on top.
    pub fn commit(&mut self, snapshot: T) {
        self.entries.push_back(snapshot);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
    }

    /// Drop the top snapshot unless it is the only one. Returns `true` when
    /// something was undone.
    pub fn undo(&mut self) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        self.entries.pop_back();
        true
    }

    /// The snapshot the editor currently shows.
    pub fn current(&self) -> &T {
        // Never empty: `new` seeds one entry and `undo` keeps the last.
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
