//! Work queue module
//!
//! The ordered holding area between task submission and execution.
//! The backing store sits behind a trait so orderings other than
//! strict FIFO can be swapped in without touching the executor or
//! the controller.

mod fifo;

pub use fifo::FifoQueue;

use std::sync::Arc;

use crate::task::SharedTask;

/// Shared handle to a work queue
pub type SharedQueue = Arc<dyn WorkQueue>;

/// Holding area for tasks awaiting execution.
///
/// Both operations are non-blocking: `push` always accepts (the queue
/// is unbounded, duplicates and all) and `pop` returns immediately
/// with the next task or `None` when there is nothing to do.
pub trait WorkQueue: Send + Sync {
    /// Append a task
    fn push(&self, task: SharedTask);

    /// Remove and return the next task, or `None` when empty
    fn pop(&self) -> Option<SharedTask>;

    /// Number of tasks currently held
    fn len(&self) -> usize;

    /// Whether the queue is currently empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
