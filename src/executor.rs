//! Single-consumer executor loop
//!
//! Drains the work queue one task at a time:
//! - An enable/disable gate controls task intake
//! - A one-way latch shuts the loop down
//! - The task being run is published through a weak current slot
//! - Finished tasks land in an append-only history

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::queue::SharedQueue;
use crate::task::{SharedTask, Task, TaskState};

// ─────────────────────────────────────────────────────────────────
// Executor Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for the executor loop
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Delay after each loop iteration
    pub idle_delay: Duration,

    /// Whether task intake starts enabled
    pub start_enabled: bool,

    /// Completed-task records to retain; 0 keeps everything
    pub max_history: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            idle_delay: Duration::from_millis(1000),
            start_enabled: true,
            max_history: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Executor
// ─────────────────────────────────────────────────────────────────

/// The single consumer of the work queue.
///
/// Exactly one `run()` loop is spawned per engine; every other method
/// is safe to call concurrently with it from any thread.
pub struct Executor {
    queue: SharedQueue,
    config: ExecutorConfig,

    /// Task intake gate
    enabled: AtomicBool,

    /// One-way shutdown latch
    shutting_down: AtomicBool,

    /// The task being run right now. Weak: the slot records the
    /// relation, the task itself is owned by the loop and the history.
    current: RwLock<Weak<Task>>,

    /// Finished tasks in execution order
    completed: RwLock<Vec<SharedTask>>,

    /// Tasks run to a terminal state since startup
    processed: AtomicUsize,
}

impl Executor {
    /// Create an executor over the given queue
    pub fn new(queue: SharedQueue, config: ExecutorConfig) -> Self {
        Self {
            queue,
            enabled: AtomicBool::new(config.start_enabled),
            shutting_down: AtomicBool::new(false),
            current: RwLock::new(Weak::new()),
            completed: RwLock::new(Vec::new()),
            processed: AtomicUsize::new(0),
            config,
        }
    }

    /// Whether task intake is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Open the intake gate
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        info!("Task intake enabled");
    }

    /// Close the intake gate. The task already running is not
    /// interrupted; queued tasks stay queued.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        info!("Task intake disabled");
    }

    /// Trip the shutdown latch. The loop exits after finishing its
    /// current iteration; there is no way back.
    pub fn request_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        info!("Executor shutdown requested");
    }

    /// Whether the shutdown latch has been tripped
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// The task being run right now, if any
    pub fn current_task(&self) -> Option<SharedTask> {
        self.current.read().upgrade()
    }

    /// Snapshot of the finished tasks, in execution order. Later
    /// completions never mutate a snapshot already handed out.
    pub fn completed_tasks(&self) -> Vec<SharedTask> {
        self.completed.read().clone()
    }

    /// Number of finished tasks currently retained
    pub fn completed_count(&self) -> usize {
        self.completed.read().len()
    }

    /// Total number of tasks run to a terminal state. Unlike
    /// [`completed_count`](Self::completed_count) this never shrinks
    /// when the retention cap evicts old history records.
    pub fn processed_count(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Run the loop until the shutdown latch trips.
    ///
    /// Spawned once per engine. Each iteration processes at most one
    /// task and is followed by the fixed idle delay, so an empty or
    /// disabled queue is polled rather than busy-waited.
    pub async fn run(&self) {
        info!(
            idle_delay_ms = self.config.idle_delay.as_millis() as u64,
            enabled = self.is_enabled(),
            "Executor loop started"
        );

        while !self.is_shutting_down() {
            self.process_next().await;
            tokio::time::sleep(self.config.idle_delay).await;
        }

        info!(processed = self.processed_count(), "Executor loop stopped");
    }

    /// One loop iteration: honor the gate, pop one task, run it to a
    /// terminal state, record it. Task failures are absorbed by
    /// `Task::start()`, so this never unwinds the loop.
    async fn process_next(&self) {
        if !self.is_enabled() {
            return;
        }

        let task = match self.queue.pop() {
            Some(task) => task,
            None => return,
        };

        *self.current.write() = Arc::downgrade(&task);
        info!(
            task_id = %task.id(),
            kind = %task.kind(),
            creator = %task.creator(),
            "Starting task execution"
        );

        let start_time = Instant::now();
        task.start().await;

        let state = task.state();
        info!(
            task_id = %task.id(),
            state = %state,
            execution_time_ms = start_time.elapsed().as_millis() as u64,
            "Task finished"
        );
        if state == TaskState::Error {
            warn!(
                task_id = %task.id(),
                results = %task.results(),
                "Task finished with an error"
            );
        }

        self.record_completed(task);
        self.processed.fetch_add(1, Ordering::SeqCst);
        *self.current.write() = Weak::new();
    }

    fn record_completed(&self, task: SharedTask) {
        let mut completed = self.completed.write();
        completed.push(task);

        let cap = self.config.max_history;
        if cap > 0 && completed.len() > cap {
            let excess = completed.len() - cap;
            completed.drain(..excess);
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
