//! Factorial demo task
//!
//! Computes n! with a simple recursive definition, polling the
//! cancellation token at every call. Results beyond 20! do not fit in
//! 64 bits and surface as an execution error rather than wrapping.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::task::{CancelToken, Work};

/// Work computing the factorial of a base value (1! = 1)
#[derive(Debug, Clone)]
pub struct FactorialWork {
    base: i64,
}

impl FactorialWork {
    /// Create work for the given base value
    pub fn new(base: i64) -> Self {
        Self { base }
    }

    fn factorial(&self, n: i64, cancel: &CancelToken) -> Result<i64> {
        cancel.check()?;

        if n == 1 {
            return Ok(1);
        }

        let rest = self.factorial(n - 1, cancel)?;
        n.checked_mul(rest).ok_or_else(|| {
            Error::execution(format!("64-bit overflow computing factorial({})", self.base))
        })
    }
}

#[async_trait]
impl Work for FactorialWork {
    fn kind(&self) -> &'static str {
        "Factorial"
    }

    fn validate(&self) -> Result<()> {
        if self.base <= 0 {
            return Err(Error::validation(format!(
                "Invalid value ({}) for factorial calculation.",
                self.base
            )));
        }
        Ok(())
    }

    async fn run(&self, cancel: &CancelToken) -> Result<String> {
        let output = self.factorial(self.base, cancel)?;
        Ok(output.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_non_positive_base() {
        let err = FactorialWork::new(0).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("Invalid value (0)"));

        assert!(FactorialWork::new(-5).validate().is_err());
    }

    #[test]
    fn test_validate_accepts_positive_base() {
        assert!(FactorialWork::new(1).validate().is_ok());
        assert!(FactorialWork::new(20).validate().is_ok());
    }

    #[tokio::test]
    async fn test_factorial_of_one() {
        let token = CancelToken::new();
        assert_eq!(FactorialWork::new(1).run(&token).await.unwrap(), "1");
    }

    #[tokio::test]
    async fn test_factorial_of_five_is_120() {
        let token = CancelToken::new();
        let result = FactorialWork::new(5).run(&token).await.unwrap();
        assert_eq!(result, "120");
    }

    #[tokio::test]
    async fn test_overflow_is_execution_error() {
        // 21! already exceeds i64; 25 keeps the recursion tiny
        let token = CancelToken::new();
        let outcome = FactorialWork::new(25).run(&token).await;

        match outcome {
            Err(Error::Execution(msg)) => assert!(msg.contains("overflow")),
            other => panic!("expected overflow error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tripped_token_cancels_run() {
        let token = CancelToken::new();
        token.request();

        let outcome = FactorialWork::new(10).run(&token).await;
        assert!(matches!(outcome, Err(Error::Cancelled)));
    }
}
