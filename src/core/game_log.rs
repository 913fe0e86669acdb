//! Bounded, newest-first ticker of game messages shown to players.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Ring of the most recent game messages, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<String>,
    capacity: usize,
}

impl GameLog {
    /// Create an empty log keeping at most `capacity` messages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vector::new(),
            capacity: capacity.max(1),
        }
    }

    /// Add a message as the newest entry, dropping the oldest past capacity.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_front(message.into());
        if self.entries.len() > self.capacity {
            self.entries.truncate(self.capacity);
        }
    }

    /// Add a batch of messages in reading order as one block on top of the
    /// log. The first message of the batch ends up newest.
    pub fn extend<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch: Vec<String> = messages.into_iter().map(Into::into).collect();
        for message in batch.into_iter().rev() {
            self.push(message);
        }
    }

    /// Newest message, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Messages newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
