//! Interactive console
//!
//! Line-based menu loop over stdin for driving the engine by hand:
//! numbered commands for identity, intake gating, scheduling,
//! cancellation and the task reports. The loop ends on the quit
//! command, EOF, or Ctrl+C; engine shutdown is the caller's job.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::task::{FactorialWork, FibonacciWork, Work};

const MENU: &str = "Enter a command:
\t1: Quit
\t2: Change identity
\t3: Enable executor
\t4: Disable executor
\t5: Schedule new task
\t6: Cancel current task
\t7: View current task
\t8: View all completed tasks";

const TASK_TYPE_MENU: &str = "Enter a task type:
\t1: Fibonacci
\t2: Factorial";

/// Run the console loop against the process's stdin
pub async fn run(controller: Arc<Controller>) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_with_input(controller, stdin).await
}

/// Run the console loop against an arbitrary line source
pub(crate) async fn run_with_input<R>(controller: Arc<Controller>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        println!("{}", MENU);

        let line = match read_line(&mut lines).await? {
            Some(line) => line,
            None => break,
        };

        match line.trim() {
            "" => continue,
            "1" => break,
            "2" => change_identity(&controller, &mut lines).await?,
            "3" => enable_executor(&controller),
            "4" => disable_executor(&controller),
            "5" => schedule_task(&controller, &mut lines).await?,
            "6" => cancel_current_task(&controller),
            "7" => view_current_task(&controller),
            "8" => view_completed_tasks(&controller),
            _ => println!("Invalid value"),
        }
    }

    debug!("Console loop finished");
    Ok(())
}

/// Read the next line, or None on EOF or Ctrl+C
async fn read_line<R>(lines: &mut Lines<R>) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    tokio::select! {
        _ = tokio::signal::ctrl_c() => Ok(None),
        line = lines.next_line() => Ok(line?),
    }
}

async fn change_identity<R>(controller: &Controller, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("Enter an identity (hint for this exercise: use either \"admin\" or \"user\")");

    let Some(line) = read_line(lines).await? else {
        return Ok(());
    };

    match controller.set_identity(line.trim()) {
        Ok(identity) => println!("Identity is now {}", identity),
        Err(e) => report_error("Unable to accept identity", &e),
    }
    Ok(())
}

fn enable_executor(controller: &Controller) {
    match controller.enable_executor() {
        Ok(()) => println!("Executor process is enabled"),
        Err(e) => report_error("Could not enable executor process", &e),
    }
}

fn disable_executor(controller: &Controller) {
    match controller.disable_executor() {
        Ok(()) => println!("Executor process is disabled"),
        Err(e) => report_error("Could not disable executor process", &e),
    }
}

async fn schedule_task<R>(controller: &Controller, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("{}", TASK_TYPE_MENU);

    let Some(line) = read_line(lines).await? else {
        return Ok(());
    };

    match line.trim() {
        "1" => {
            println!("Enter desired Fibonacci index (1 - n):");
            if let Some(index) = read_number(lines).await? {
                submit(controller, Box::new(FibonacciWork::new(index)), "Fibonacci");
            }
        }
        "2" => {
            println!("Enter desired Factorial base number (1 - n):");
            if let Some(base) = read_number(lines).await? {
                submit(controller, Box::new(FactorialWork::new(base)), "Factorial");
            }
        }
        _ => println!("Invalid task type"),
    }
    Ok(())
}

fn submit(controller: &Controller, work: Box<dyn Work>, kind: &str) {
    match controller.schedule(work) {
        Ok(()) => println!("{} task scheduled", kind),
        Err(e) => report_error("Unable to schedule task", &e),
    }
}

/// Read a line and parse it as a number; None on bad input or EOF
async fn read_number<R>(lines: &mut Lines<R>) -> Result<Option<i64>>
where
    R: AsyncBufRead + Unpin,
{
    let Some(line) = read_line(lines).await? else {
        return Ok(None);
    };

    match line.trim().parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            println!("Invalid value");
            Ok(None)
        }
    }
}

fn cancel_current_task(controller: &Controller) {
    match controller.request_cancel_current() {
        Ok(()) => println!("Done"),
        Err(e) => report_error("Could not cancel current task", &e),
    }
}

fn view_current_task(controller: &Controller) {
    match controller.current_task_info() {
        Ok(info) => println!("{}", info),
        Err(e) => report_error("Could not fetch current task info", &e),
    }
}

fn view_completed_tasks(controller: &Controller) {
    println!("{}", controller.completed_tasks_info());
}

fn report_error(context: &str, err: &Error) {
    debug!(retryable = err.is_retryable(), "{}", err.format_for_log());
    println!("{}", context);
    print!("{}", err.format_for_terminal());
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::executor::{Executor, ExecutorConfig};
    use crate::queue::{FifoQueue, SharedQueue};

    fn rig() -> (SharedQueue, Arc<Executor>, Arc<Controller>) {
        let queue: SharedQueue = Arc::new(FifoQueue::new());
        let config = ExecutorConfig {
            idle_delay: Duration::from_millis(1),
            ..Default::default()
        };
        let executor = Arc::new(Executor::new(Arc::clone(&queue), config));
        let controller = Arc::new(Controller::new(Arc::clone(&queue), Arc::clone(&executor)));
        (queue, executor, controller)
    }

    async fn script(input: &'static str) -> (SharedQueue, Arc<Executor>, Arc<Controller>) {
        let (queue, executor, controller) = rig();
        run_with_input(Arc::clone(&controller), BufReader::new(input.as_bytes()))
            .await
            .unwrap();
        (queue, executor, controller)
    }

    #[tokio::test]
    async fn test_quit_command() {
        let (queue, _executor, _controller) = script("1\n").await;
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_eof_ends_loop() {
        let (queue, _executor, _controller) = script("").await;
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_command_then_quit() {
        let (queue, _executor, _controller) = script("42\n1\n").await;
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_schedule_fibonacci() {
        let (queue, _executor, _controller) = script("5\n1\n6\n1\n").await;

        assert_eq!(queue.len(), 1);
        let task = queue.pop().unwrap();
        assert_eq!(task.kind(), "Fibonacci");
        assert_eq!(task.creator(), "user");
    }

    #[tokio::test]
    async fn test_schedule_factorial() {
        let (queue, _executor, _controller) = script("5\n2\n5\n1\n").await;

        assert_eq!(queue.pop().unwrap().kind(), "Factorial");
    }

    #[tokio::test]
    async fn test_schedule_invalid_task_type() {
        let (queue, _executor, _controller) = script("5\n3\n1\n").await;
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_schedule_non_numeric_argument() {
        let (queue, _executor, _controller) = script("5\n1\nabc\n1\n").await;
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_identity_change_gates_disable() {
        // As the default identity the disable is refused
        let (_queue, executor, _controller) = script("4\n1\n").await;
        assert!(executor.is_enabled());

        // As admin it goes through
        let (_queue, executor, _controller) = script("2\nadmin\n4\n1\n").await;
        assert!(!executor.is_enabled());
    }

    #[tokio::test]
    async fn test_identity_survives_bad_name() {
        let (_queue, _executor, controller) = script("2\nroot\n1\n").await;
        assert_eq!(controller.identity().as_str(), "user");
    }

    #[tokio::test]
    async fn test_blank_line_reprints_menu() {
        let (queue, _executor, _controller) = script("\n\n1\n").await;
        assert!(queue.is_empty());
    }
}
