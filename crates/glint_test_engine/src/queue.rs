//! FIFO execution queue

use crate::registry::TestId;
use std::collections::VecDeque;

/// Pending tests plus the one that is running
///
/// A test id appears at most once across `pending` and `running`.
#[derive(Debug, Default)]
pub struct TestQueue {
    pending: VecDeque<TestId>,
    running: Option<TestId>,
}

impl TestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id`; returns false (and changes nothing) when it is already
    /// queued or running
    pub fn enqueue(&mut self, id: TestId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.pending.push_back(id);
        true
    }

    pub fn contains(&self, id: &TestId) -> bool {
        self.running.as_ref() == Some(id) || self.pending.contains(id)
    }

    /// Promote the next pending test; no-op while one is running
    pub fn start_next(&mut self) -> Option<&TestId> {
        if self.running.is_none() {
            self.running = self.pending.pop_front();
        }
        self.running.as_ref()
    }

    pub fn running(&self) -> Option<&TestId> {
        self.running.as_ref()
    }

    /// The running test finished
    pub fn finish_running(&mut self) -> Option<TestId> {
        self.running.take()
    }

    /// Drop everything, returning the running test first
    pub fn drain(&mut self) -> Vec<TestId> {
        self.running.take().into_iter().chain(self.pending.drain(..)).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &TestId> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.running.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
