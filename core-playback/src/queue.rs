//! # Playback Queue
//!
//! Ordered verse indices plus a cursor. The cursor is either `None` or a
//! valid position in the sequence; running off the end clears the queue and
//! reports [`QueueStep::Exhausted`] instead of wrapping.

use serde::{Deserialize, Serialize};

/// Result of [`PlaybackQueue::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStep {
    /// Cursor moved; carries the verse index now at the cursor.
    Next(usize),
    /// The cursor was on the last entry. The queue is now empty.
    Exhausted,
    /// Nothing was queued.
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackQueue {
    indices: Vec<usize>,
    cursor: Option<usize>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue. The cursor lands on the first entry, or `None` when
    /// `indices` is empty.
    pub fn load(&mut self, indices: Vec<usize>) {
        self.cursor = if indices.is_empty() { None } else { Some(0) };
        self.indices = indices;
    }

    pub fn advance(&mut self) -> QueueStep {
        let Some(cursor) = self.cursor else {
            return QueueStep::Empty;
        };

        let next = cursor + 1;
        if next < self.indices.len() {
            self.cursor = Some(next);
            QueueStep::Next(self.indices[next])
        } else {
            self.clear();
            QueueStep::Exhausted
        }
    }

    /// Move back one entry. At the first entry this is a no-op and returns
    /// `false`.
    pub fn retreat(&mut self) -> bool {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.cursor = None;
    }

    /// Verse index at the cursor.
    pub fn current(&self) -> Option<usize> {
        self.cursor.and_then(|cursor| self.indices.get(cursor).copied())
    }

    /// Cursor position within the queue.
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}
