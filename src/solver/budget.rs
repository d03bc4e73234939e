//! Wall-clock budget and cooperative cancellation for one solve attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::SolveError;

/// Shared abort flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Mandatory limit on a single solve attempt.
///
/// The clock starts when the budget is created. Strategies poll
/// [`SolveBudget::check`] between units of work.
#[derive(Debug, Clone)]
pub struct SolveBudget {
    started: Instant,
    limit: Duration,
    cancel: CancelToken,
}

impl SolveBudget {
    /// Creates a budget that expires after `limit`.
    pub fn new(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
            cancel: CancelToken::new(),
        }
    }

    /// Creates a budget of `ms` milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Attaches a cancellation token.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// The cancellation token.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Budget length in milliseconds.
    pub fn limit_ms(&self) -> u64 {
        u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX)
    }

    /// Time spent since the budget was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Time left (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    /// Whether the wall-clock limit has passed.
    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.limit
    }

    /// Fails with `Cancelled` or `Timeout` when work must stop.
    pub fn check(&self) -> Result<(), SolveError> {
        if self.cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }
        if self.is_expired() {
            return Err(SolveError::Timeout {
                budget_ms: self.limit_ms(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_budget_passes() {
        let budget = SolveBudget::from_millis(60_000);
        assert!(budget.check().is_ok());
        assert!(!budget.is_expired());
        assert!(budget.remaining() > Duration::from_secs(50));
        assert_eq!(budget.limit_ms(), 60_000);
    }

    #[test]
    fn test_zero_budget_times_out() {
        let budget = SolveBudget::from_millis(0);
        assert!(budget.is_expired());
        assert_eq!(budget.check(), Err(SolveError::Timeout { budget_ms: 0 }));
        assert_eq!(budget.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_cancel_is_shared() {
        let token = CancelToken::new();
        let budget = SolveBudget::from_millis(60_000).with_cancel(token.clone());
        assert!(budget.check().is_ok());
        token.cancel();
        assert!(budget.cancel_token().is_cancelled());
        assert_eq!(budget.check(), Err(SolveError::Cancelled));
    }

    #[test]
    fn test_cancel_wins_over_timeout() {
        let token = CancelToken::new();
        token.cancel();
        let budget = SolveBudget::from_millis(0).with_cancel(token);
        assert_eq!(budget.check(), Err(SolveError::Cancelled));
    }
}
