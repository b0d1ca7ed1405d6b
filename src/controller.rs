//! Controller facade
//!
//! The single entry point callers use to reach the engine:
//! - Schedule work (intake gate, creator stamping, validation)
//! - Steer the executor (enable/disable, cancel-current) as admin
//! - Render the current task and the completed history
//! - Switch the session identity
//!
//! Constructed once at startup and shared by handle; never a global.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::queue::SharedQueue;
use crate::task::{Task, Work};

/// Line separating task blocks in history renderings
const HISTORY_DELIMITER: &str = "--------------------\n";

/// Placeholder returned when no task is currently running
const NO_TASK_PLACEHOLDER: &str = "<No task>";

// ─────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────

/// Caller identity, from the fixed set the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Ordinary caller: may schedule work and read the history
    Standard,
    /// Administrator: may additionally steer the executor
    Admin,
}

impl Identity {
    /// Parse an identity name, case-insensitively
    pub fn parse(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("admin") {
            Ok(Identity::Admin)
        } else if name.eq_ignore_ascii_case("user") {
            Ok(Identity::Standard)
        } else {
            Err(Error::UnknownIdentity(name.to_string()))
        }
    }

    /// Canonical name, as stamped onto scheduled tasks
    pub fn as_str(&self) -> &'static str {
        match self {
            Identity::Standard => "user",
            Identity::Admin => "admin",
        }
    }

    /// Whether this identity may perform privileged operations
    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::Standard
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────

/// Caller-facing facade over the queue and the executor.
///
/// Holds the session identity. Every method is safe to call
/// concurrently with the executor loop.
pub struct Controller {
    queue: SharedQueue,
    executor: Arc<Executor>,
    identity: RwLock<Identity>,
}

impl Controller {
    /// Create a controller over an engine's queue and executor
    pub fn new(queue: SharedQueue, executor: Arc<Executor>) -> Self {
        Self {
            queue,
            executor,
            identity: RwLock::new(Identity::default()),
        }
    }

    /// Current session identity
    pub fn identity(&self) -> Identity {
        *self.identity.read()
    }

    /// Switch the session identity. An unknown name leaves the
    /// current identity in place.
    pub fn set_identity(&self, name: &str) -> Result<Identity> {
        let identity = Identity::parse(name)?;
        *self.identity.write() = identity;
        info!(identity = %identity, "Identity changed");
        Ok(identity)
    }

    /// Validate and enqueue work on behalf of the session identity.
    ///
    /// Rejected outright while the executor is not accepting work;
    /// the queue is left untouched on every failure path.
    pub fn schedule(&self, work: Box<dyn Work>) -> Result<()> {
        // The intake gate is the executor's enabled flag; the
        // controller keeps no second copy of that state.
        if !self.executor.is_enabled() {
            return Err(Error::IntakeDisabled);
        }

        let mut task = Task::new(work);
        task.set_creator(self.identity().as_str());
        task.validate()?;

        let task = Arc::new(task);
        self.queue.push(Arc::clone(&task));
        info!(
            task_id = %task.id(),
            kind = %task.kind(),
            creator = %task.creator(),
            queue_depth = self.queue.len(),
            "Task scheduled"
        );
        Ok(())
    }

    /// Open the executor's intake gate. Admin only.
    pub fn enable_executor(&self) -> Result<()> {
        self.require_admin()?;
        self.executor.enable();
        Ok(())
    }

    /// Close the executor's intake gate. Admin only. Does not
    /// interrupt the task already running.
    pub fn disable_executor(&self) -> Result<()> {
        self.require_admin()?;
        self.executor.disable();
        Ok(())
    }

    /// Flag the currently running task for cancellation. Admin only.
    ///
    /// Advisory: the task's work decides if and when to observe the
    /// signal. With no current task, or one already terminal, this is
    /// a silent no-op.
    pub fn request_cancel_current(&self) -> Result<()> {
        self.require_admin()?;

        if let Some(task) = self.executor.current_task() {
            if task.request_cancel() {
                info!(task_id = %task.id(), "Cancellation requested");
            }
        }
        Ok(())
    }

    /// Rendering of the currently running task, or a fixed
    /// placeholder. Admin only.
    pub fn current_task_info(&self) -> Result<String> {
        self.require_admin()?;

        Ok(self
            .executor
            .current_task()
            .map(|task| task.describe())
            .unwrap_or_else(|| NO_TASK_PLACEHOLDER.to_string()))
    }

    /// Rendering of every finished task, oldest first, each block
    /// framed by a delimiter line with one trailing delimiter.
    /// Open to any identity: the history is the engine's only
    /// user-visible output.
    pub fn completed_tasks_info(&self) -> String {
        let tasks = self.executor.completed_tasks();

        let mut output = String::new();
        for task in &tasks {
            output.push_str(HISTORY_DELIMITER);
            output.push_str(&task.describe());
            output.push('\n');
        }
        output.push_str(HISTORY_DELIMITER);

        output
    }

    /// Trip the executor's one-way shutdown latch. Not identity
    /// gated: shutting down is the process owner's action.
    pub fn request_shutdown(&self) {
        self.executor.request_shutdown();
    }

    fn require_admin(&self) -> Result<()> {
        if self.identity.read().is_admin() {
            Ok(())
        } else {
            Err(Error::AdminRequired)
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
