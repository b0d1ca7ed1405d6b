//! Strict first-in-first-out queue backing

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::WorkQueue;
use crate::task::SharedTask;

/// Unbounded FIFO queue over a locked `VecDeque`
#[derive(Default)]
pub struct FifoQueue {
    inner: Mutex<VecDeque<SharedTask>>,
}

impl FifoQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkQueue for FifoQueue {
    fn push(&self, task: SharedTask) {
        self.inner.lock().push_back(task);
    }

    fn pop(&self) -> Option<SharedTask> {
        self.inner.lock().pop_front()
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
