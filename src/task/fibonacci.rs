//! Fibonacci demo task
//!
//! Computes the n-th Fibonacci number with the naive recursive
//! definition. Deliberately slow: every recursive call polls the
//! cancellation token, which makes large indices the convenient way to
//! exercise cooperative cancellation. Recursion depth grows linearly
//! with the index, so very large indices also grow the stack.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::task::{CancelToken, Work};

/// Work computing the n-th Fibonacci number (fib(1) = fib(2) = 1)
#[derive(Debug, Clone)]
pub struct FibonacciWork {
    index: i64,
}

impl FibonacciWork {
    /// Create work for the given sequence index
    pub fn new(index: i64) -> Self {
        Self { index }
    }

    fn nth(&self, n: i64, cancel: &CancelToken) -> Result<i64> {
        cancel.check()?;

        if n == 1 || n == 2 {
            return Ok(1);
        }

        let a = self.nth(n - 1, cancel)?;
        let b = self.nth(n - 2, cancel)?;
        a.checked_add(b).ok_or_else(|| {
            Error::execution(format!("64-bit overflow computing Fibonacci({})", self.index))
        })
    }
}

#[async_trait]
impl Work for FibonacciWork {
    fn kind(&self) -> &'static str {
        "Fibonacci"
    }

    fn validate(&self) -> Result<()> {
        if self.index <= 0 {
            return Err(Error::validation(format!(
                "Invalid index ({}) for Fibonacci sequence.",
                self.index
            )));
        }
        Ok(())
    }

    async fn run(&self, cancel: &CancelToken) -> Result<String> {
        let output = self.nth(self.index, cancel)?;
        Ok(output.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
