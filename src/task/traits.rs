//! Work trait definition
//!
//! Defines the capability every schedulable unit of work must expose.
//! Concrete kinds implement this independently and are composed into a
//! [`Task`](crate::task::Task); there is no inheritance hierarchy.

use async_trait::async_trait;

use crate::error::Result;
use crate::task::CancelToken;

/// A unit of work the engine can run.
///
/// Implementations are owned by a single task and run at most once at
/// a time, so `&self` methods need no internal locking of their own.
#[async_trait]
pub trait Work: Send + Sync {
    /// Short kind label shown in task renderings (e.g. "Fibonacci")
    fn kind(&self) -> &'static str;

    /// Check the work's arguments are populated and in range.
    /// Runs before the task is accepted and again before execution.
    fn validate(&self) -> Result<()>;

    /// Perform the work, producing the result text.
    ///
    /// Long-running implementations should poll `cancel` between units
    /// of progress and bail out with [`Error::Cancelled`] once it is
    /// tripped; nothing preempts work that never polls.
    ///
    /// [`Error::Cancelled`]: crate::error::Error::Cancelled
    async fn run(&self, cancel: &CancelToken) -> Result<String>;
}
