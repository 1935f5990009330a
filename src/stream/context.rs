//! Rolling window of recent interviewer questions.

use std::collections::VecDeque;

/// Size-bounded FIFO of the most recent QUESTION utterances.
///
/// Snapshots are attached to chunks as extraction context only; the
/// window is never persisted into process memory.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    entries: VecDeque<String>,
    capacity: usize,
}

impl ContextWindow {
    /// Creates a window holding up to `capacity` questions. A capacity
    /// of zero disables question context entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a question, evicting the oldest once full.
    pub fn push(&mut self, question: &str) {
        let question = question.trim();
        if question.is_empty() || self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(question.to_string());
    }

    /// Clones the current questions, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
