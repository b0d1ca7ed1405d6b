//! Task lifecycle state machine
//!
//! A task moves PENDING → RUNNING → {COMPLETED | CANCELLED | ERROR},
//! with an advisory CANCELLING signal settable while it is still
//! PENDING or RUNNING. Terminal states are never left.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::task::Work;

/// Fixed result text recorded when work observes its cancellation signal.
pub const CANCELLED_RESULT: &str = "Task cancelled before completion";

// ─────────────────────────────────────────────────────────────────
// Task State
// ─────────────────────────────────────────────────────────────────

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Accepted, waiting in the queue
    Pending,
    /// Currently being executed
    Running,
    /// Cancellation requested; advisory until the work observes it
    Cancelling,
    /// Terminated after observing a cancellation request
    Cancelled,
    /// Finished successfully
    Completed,
    /// Finished with a failure
    Error,
}

impl Default for TaskState {
    fn default() -> Self {
        TaskState::Pending
    }
}

impl TaskState {
    /// Whether this state is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Cancelled | TaskState::Completed | TaskState::Error
        )
    }

    /// Uppercase state name as shown in task renderings
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Running => "RUNNING",
            TaskState::Cancelling => "CANCELLING",
            TaskState::Cancelled => "CANCELLED",
            TaskState::Completed => "COMPLETED",
            TaskState::Error => "ERROR",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────
// Cancellation Token
// ─────────────────────────────────────────────────────────────────

/// Cooperative cancellation flag handed to running work.
///
/// Cancellation is advisory: tripping the token never preempts
/// anything. Work decides if and when to poll, typically once per
/// unit of progress, and bails out with [`Error::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an untripped token
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token
    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Poll point for running work: error out once the token is tripped
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────

/// Shared handle to a task
pub type SharedTask = Arc<Task>;

/// A schedulable, cancellable unit of work plus its management state.
///
/// The work logic itself lives behind the [`Work`] trait; `Task` adds
/// what the engine needs around it: the lifecycle state cell, the
/// creator stamp, the recorded result text, and the cancellation
/// token. Only the executor transitions a task through `start()`;
/// external actors are limited to `request_cancel()`.
pub struct Task {
    /// Short random id, used in logs only
    id: String,

    /// The work to perform
    work: Box<dyn Work>,

    /// Identity that scheduled the task; stamped before enqueue
    creator: String,

    /// Current lifecycle state
    state: RwLock<TaskState>,

    /// Result text, written once on reaching a terminal state
    results: RwLock<String>,

    /// Cancellation signal observed by the work
    cancel: CancelToken,
}

impl Task {
    /// Wrap work into a fresh PENDING task with no creator
    pub fn new(work: Box<dyn Work>) -> Self {
        Self {
            id: format!("task-{}", &Uuid::new_v4().to_string()[..8]),
            work,
            creator: String::new(),
            state: RwLock::new(TaskState::Pending),
            results: RwLock::new(String::new()),
            cancel: CancelToken::new(),
        }
    }

    /// Log id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind label of the underlying work
    pub fn kind(&self) -> &'static str {
        self.work.kind()
    }

    /// Identity that scheduled the task (empty until stamped)
    pub fn creator(&self) -> String {
        self.creator.clone()
    }

    /// Stamp the scheduling identity. Called once, before the task is
    /// shared; after that the creator is immutable.
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.creator = creator.into();
    }

    /// Current lifecycle state
    pub fn state(&self) -> TaskState {
        *self.state.read()
    }

    /// Recorded result text (empty until terminal)
    pub fn results(&self) -> String {
        self.results.read().clone()
    }

    /// Check the task is runnable: a non-blank creator and valid work
    /// arguments. Called by the controller before enqueue and again
    /// defensively by `start()`.
    pub fn validate(&self) -> Result<()> {
        if self.creator.trim().is_empty() {
            return Err(Error::validation("Missing creator"));
        }
        self.work.validate()
    }

    /// Signal cancellation.
    ///
    /// Advisory only: marks the task CANCELLING and trips the token if
    /// it is still PENDING or RUNNING. On a task already terminal (or
    /// already CANCELLING) this is a no-op. Returns whether the signal
    /// was newly set.
    pub fn request_cancel(&self) -> bool {
        let mut state = self.state.write();
        match *state {
            TaskState::Pending | TaskState::Running => {
                *state = TaskState::Cancelling;
                self.cancel.request();
                true
            }
            _ => false,
        }
    }

    /// Run the task to a terminal state.
    ///
    /// Marks the task RUNNING, re-validates, and hands the work its
    /// cancellation token. Never returns an error: success lands in
    /// COMPLETED with the produced result text, an observed
    /// cancellation in CANCELLED with [`CANCELLED_RESULT`], and any
    /// other failure in ERROR with the failure's message. A task
    /// already terminal is left untouched.
    pub async fn start(&self) {
        if self.state().is_terminal() {
            return;
        }
        *self.state.write() = TaskState::Running;

        let outcome = match self.validate() {
            Ok(()) => self.work.run(&self.cancel).await,
            Err(e) => Err(e),
        };

        // Results are recorded before the terminal state becomes
        // visible, so an observer seeing a terminal state sees them.
        match outcome {
            Ok(results) => {
                *self.results.write() = results;
                *self.state.write() = TaskState::Completed;
            }
            Err(Error::Cancelled) => {
                *self.results.write() = CANCELLED_RESULT.to_string();
                *self.state.write() = TaskState::Cancelled;
            }
            Err(e) => {
                *self.results.write() = e.to_string();
                *self.state.write() = TaskState::Error;
            }
        }
    }

    /// Four-line rendering of the task, each line newline-terminated
    pub fn describe(&self) -> String {
        format!(
            "Type: {}\nUser: {}\nState: {}\nResult: {}\n",
            self.work.kind(),
            self.creator,
            self.state(),
            self.results(),
        )
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("kind", &self.work.kind())
            .field("creator", &self.creator)
            .field("state", &self.state())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
