//! Task model
//!
//! Everything a unit of work carries through the engine:
//! - The lifecycle state machine and cancellation token
//! - The Work capability trait concrete kinds implement
//! - The demo payloads (Fibonacci, Factorial)

mod factorial;
mod fibonacci;
mod state;
mod traits;

pub use factorial::FactorialWork;
pub use fibonacci::FibonacciWork;
pub use state::{CancelToken, SharedTask, Task, TaskState};
pub use traits::Work;
